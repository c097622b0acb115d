//! Raw interpreter entries read from the registry.

use std::path::PathBuf;

use crate::error::{LocateError, Result};
use crate::info::{
    parse_version, parse_version_or_unknown, Architecture, EnvKind, EnvSource, PythonEnvInfo,
    PythonVersion,
};
use crate::paths;
use crate::services::registry::{RegistryHive, RegistryView};
use crate::services::FileSystem;

/// One interpreter registered under `\SOFTWARE\Python\<company>\<tag>`.
///
/// Empty registry strings are stored as `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryRecord {
    pub interpreter_path: PathBuf,
    /// `Version` value of the tag key.
    pub version_str: Option<String>,
    /// `SysVersion` value of the tag key.
    pub sys_version_str: Option<String>,
    /// `SysArchitecture` value of the tag key (`32bit` / `64bit`).
    pub bitness_str: Option<String>,
    /// Company key name, e.g. `PythonCore`.
    pub distro_org_name: Option<String>,
    /// `DisplayName` of the tag, or of the company when the tag has none.
    pub company_display_name: Option<String>,
    pub hive: RegistryHive,
    pub view: RegistryView,
}

impl RegistryRecord {
    /// Create a record with only the interpreter path set.
    pub fn new(interpreter_path: impl Into<PathBuf>, hive: RegistryHive, view: RegistryView) -> Self {
        Self {
            interpreter_path: interpreter_path.into(),
            version_str: None,
            sys_version_str: None,
            bitness_str: None,
            distro_org_name: None,
            company_display_name: None,
            hive,
            view,
        }
    }

    /// Best version this record supports.
    ///
    /// `Version` is used when it agrees with `SysVersion` (same major, and
    /// same minor when `SysVersion` has one); otherwise `SysVersion` wins.
    /// Some distributions store build labels like `py38_4.8.3` in `Version`.
    /// Without either value the executable file name is parsed.
    pub fn version(&self) -> PythonVersion {
        let full = self.version_str.as_deref().and_then(|s| parse_version(s).ok());
        let sys = self
            .sys_version_str
            .as_deref()
            .and_then(|s| parse_version(s).ok());

        match (full, sys) {
            (Some(full), Some(sys)) if agrees_with(&full, &sys) => full,
            (_, Some(sys)) => sys,
            (Some(full), None) => full,
            (None, None) => paths::file_name(&self.interpreter_path)
                .map(|name| parse_version_or_unknown(&name))
                .unwrap_or_else(PythonVersion::unknown),
        }
    }

    /// Architecture from `SysArchitecture`; unknown when the value is missing.
    pub fn architecture(&self) -> Architecture {
        self.bitness_str
            .as_deref()
            .map_or(Architecture::Unknown, Architecture::from_bitness)
    }

    /// Build the description of a registry-only interpreter.
    pub fn to_env_info(&self, fs: &dyn FileSystem) -> Result<PythonEnvInfo> {
        if self.interpreter_path.as_os_str().is_empty() {
            return Err(LocateError::InvalidPath {
                reason: "registry entry has an empty ExecutablePath".to_string(),
            });
        }

        let mut info = PythonEnvInfo::new(EnvKind::OtherGlobal, self.interpreter_path.clone())
            .with_version(self.version())
            .with_arch(self.architecture())
            .with_source(EnvSource::WindowsRegistry);
        info.org = self.distro_org_name.clone();
        info.display_name = self.company_display_name.clone();

        if let Some(dir) = paths::parent_dir(&self.interpreter_path) {
            info.name = paths::file_name(&dir);
            info.location = Some(dir);
        }

        match fs.stat_file(&self.interpreter_path) {
            Ok(file_info) => info.file_info = Some(file_info),
            Err(e) => tracing::trace!("{}", e),
        }

        Ok(info)
    }
}

fn agrees_with(full: &PythonVersion, sys: &PythonVersion) -> bool {
    full.major == sys.major && (sys.minor.is_none() || full.minor == sys.minor)
}
