//! pyenv (and pyenv-win) installs.
//!
//! Every interpreter pyenv manages lives in `<root>/versions/<name>/`,
//! where `<name>` is the pyenv version name, e.g. `3.9.0` or
//! `pypy3.6-7.3.1`.

use std::path::{Path, PathBuf};

use crate::info::{parse_version_or_unknown, EnvKind, EnvSource, PythonEnvInfo, PythonVersion};
use crate::paths;
use crate::services::Services;

/// pyenv root: `PYENV_ROOT`, then the configured root, then the default
/// under the home directory.
pub fn pyenv_root(services: &Services) -> Option<PathBuf> {
    services
        .env_var("PYENV_ROOT")
        .map(PathBuf::from)
        .or_else(|| services.pyenv_root.clone())
        .or_else(|| {
            services.home_dir.as_ref().map(|home| {
                let root = home.join(".pyenv");
                if cfg!(windows) {
                    root.join("pyenv-win")
                } else {
                    root
                }
            })
        })
}

/// Version information encoded in a pyenv version name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionName {
    pub org: Option<String>,
    pub version: PythonVersion,
}

/// Parse a pyenv version name.
///
/// Names starting with a digit are CPython versions. Anything else is
/// `<distro>[-<distro version>]`: the distro's alphabetic prefix is the
/// org and a numeric suffix, if any, is the Python version.
///
/// ```
/// use pylocate::recognizers::pyenv::parse_version_name;
///
/// let pypy = parse_version_name("pypy3.6-7.3.1");
/// assert_eq!(pypy.org.as_deref(), Some("pypy"));
/// assert_eq!(pypy.version.to_string(), "3.6");
///
/// let cpython = parse_version_name("3.10-dev");
/// assert_eq!(cpython.org, None);
/// assert_eq!(cpython.version.to_string(), "3.10dev");
/// ```
pub fn parse_version_name(name: &str) -> VersionName {
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        return VersionName {
            org: None,
            version: parse_version_or_unknown(name),
        };
    }

    let distro = name.split('-').next().unwrap_or(name);
    let split = distro
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(distro.len());
    let (org, suffix) = distro.split_at(split);

    VersionName {
        org: (!org.is_empty()).then(|| org.to_string()),
        version: if suffix.starts_with(|c: char| c.is_ascii_digit()) {
            parse_version_or_unknown(suffix)
        } else {
            PythonVersion::unknown()
        },
    }
}

/// Describe `executable` if it lives under `<pyenv root>/versions`.
pub fn resolve(executable: &Path, services: &Services) -> Option<PythonEnvInfo> {
    let root = pyenv_root(services)?;
    let versions = paths::join(&root, "versions");
    if !services.fs.is_dir(&versions) {
        return None;
    }

    let relative = paths::relative_components(executable, &versions)?;
    if relative.len() < 2 {
        return None;
    }
    let name = relative[0].clone();
    let parsed = parse_version_name(&name);

    let mut info = PythonEnvInfo::new(EnvKind::Pyenv, executable)
        .with_version(parsed.version)
        .with_display_name(format!("{}:pyenv", name))
        .with_location(paths::join(&versions, &name))
        .with_name(name)
        .with_source(EnvSource::Pyenv);
    info.org = parsed.org;

    Some(info)
}
