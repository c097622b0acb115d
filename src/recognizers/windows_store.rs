//! Microsoft Store Python.
//!
//! Store packages expose app execution aliases in
//! `%LOCALAPPDATA%\Microsoft\WindowsApps` and install the real binaries
//! under `Program Files\WindowsApps`. Recognition is path-based only: the
//! aliases are reparse points that ordinary file checks cannot see.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::info::{parse_version_or_unknown, Architecture, EnvKind, EnvSource, PythonEnvInfo};
use crate::paths;
use crate::services::Services;

/// Distributor of Store packages.
pub const STORE_COMPANY: &str = "Microsoft";

static STORE_EXE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^python(3(\.\d+)?)?\.exe$").expect("store executable pattern is valid")
});

static STORE_PACKAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^PythonSoftwareFoundation\.Python\.(\d+\.\d+)_")
        .expect("store package pattern is valid")
});

/// Whether `executable` lies in a Store application directory.
pub fn is_store_path(executable: &Path, services: &Services) -> bool {
    if let Some(local_app_data) = services.env_var("LOCALAPPDATA") {
        let apps = Path::new(&local_app_data).join("Microsoft").join("WindowsApps");
        if paths::is_within(executable, &apps) {
            return true;
        }
    }

    paths::components(executable)
        .windows(2)
        .any(|pair| {
            pair[0].eq_ignore_ascii_case("Program Files")
                && pair[1].eq_ignore_ascii_case("WindowsApps")
        })
}

/// Describe `executable` if it is a Store interpreter.
pub fn resolve(executable: &Path, services: &Services) -> Option<PythonEnvInfo> {
    let file_name = paths::file_name(executable)?;
    if !STORE_EXE.is_match(&file_name) || !is_store_path(executable, services) {
        return None;
    }

    let mut version = parse_version_or_unknown(&file_name);
    if version.is_unknown() {
        if let Some(package_version) = paths::components(executable)
            .iter()
            .find_map(|c| STORE_PACKAGE.captures(c))
            .and_then(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        {
            version = parse_version_or_unknown(&package_version);
        }
    }

    Some(
        PythonEnvInfo::new(EnvKind::WindowsStore, executable)
            .with_version(version)
            .with_arch(Architecture::X64)
            .with_org(STORE_COMPANY)
            .with_source(EnvSource::PathEnvVar),
    )
}
