//! Canonical interpreter descriptions.
//!
//! [`PythonEnvInfo`] is the single output unit of resolution. Every
//! optional field is an `Option`, so "absent" is never confused with an
//! empty string.
//!
//! # Modules
//!
//! - [`version`] - Version parsing and completeness ordering

pub mod version;

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use version::{parse_version, parse_version_or_unknown, Completeness, PythonVersion};

/// Kind of environment an interpreter belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvKind {
    /// No channel recognized the interpreter.
    Unknown,
    /// A global install known only from the registry.
    OtherGlobal,
    /// Managed by the pyenv version manager.
    Pyenv,
    /// A conda environment.
    Conda,
    /// Installed from the Microsoft Store.
    WindowsStore,
    /// A `venv` environment (has `pyvenv.cfg`).
    Venv,
    /// A `virtualenv` environment without `pyvenv.cfg`.
    VirtualEnv,
}

impl EnvKind {
    /// Whether this kind says nothing about how the interpreter was installed.
    pub fn is_generic(self) -> bool {
        matches!(self, EnvKind::Unknown | EnvKind::OtherGlobal)
    }
}

impl fmt::Display for EnvKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EnvKind::Unknown => "unknown",
            EnvKind::OtherGlobal => "global",
            EnvKind::Pyenv => "pyenv",
            EnvKind::Conda => "conda",
            EnvKind::WindowsStore => "windows store",
            EnvKind::Venv => "venv",
            EnvKind::VirtualEnv => "virtualenv",
        };
        write!(f, "{}", name)
    }
}

/// Where knowledge about an environment came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvSource {
    Pyenv,
    Conda,
    PathEnvVar,
    WindowsRegistry,
}

/// Interpreter bitness.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Architecture {
    #[default]
    Unknown,
    X86,
    X64,
}

impl Architecture {
    /// Architecture of the machine running this process.
    ///
    /// Only x86 and x86_64 have a counterpart; ARM and others are unknown.
    pub fn host() -> Self {
        Self::from_target(std::env::consts::ARCH)
    }

    fn from_target(arch: &str) -> Self {
        match arch {
            "x86" => Architecture::X86,
            "x86_64" => Architecture::X64,
            _ => Architecture::Unknown,
        }
    }

    /// Interpret a registry `SysArchitecture` value.
    ///
    /// Blank is unknown, `32bit` is x86 and any other value is x64.
    pub fn from_bitness(bitness: &str) -> Self {
        let bitness = bitness.trim();
        if bitness.is_empty() {
            Architecture::Unknown
        } else if bitness.eq_ignore_ascii_case("32bit") {
            Architecture::X86
        } else {
            Architecture::X64
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Architecture::Unknown => write!(f, "unknown"),
            Architecture::X86 => write!(f, "x86"),
            Architecture::X64 => write!(f, "x64"),
        }
    }
}

/// Size-independent identity of an executable file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileInfo {
    pub ctime: Option<DateTime<Utc>>,
    pub mtime: Option<DateTime<Utc>>,
}

/// Canonical description of one interpreter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PythonEnvInfo {
    pub kind: EnvKind,
    pub executable: PathBuf,
    pub file_info: Option<FileInfo>,
    pub version: PythonVersion,
    pub arch: Architecture,
    /// Distributor name (e.g. `PythonCore`, `Anaconda, Inc.`).
    pub org: Option<String>,
    pub display_name: Option<String>,
    pub name: Option<String>,
    pub location: Option<PathBuf>,
    /// Set when the environment was found inside a workspace folder.
    pub search_location: Option<PathBuf>,
    /// Provenance tags, ordered and without duplicates.
    pub sources: Vec<EnvSource>,
}

impl PythonEnvInfo {
    /// Create a description carrying only a kind and an executable.
    pub fn new(kind: EnvKind, executable: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            executable: executable.into(),
            file_info: None,
            version: PythonVersion::unknown(),
            arch: Architecture::Unknown,
            org: None,
            display_name: None,
            name: None,
            location: None,
            search_location: None,
            sources: Vec::new(),
        }
    }

    /// Set the version.
    pub fn with_version(mut self, version: PythonVersion) -> Self {
        self.version = version;
        self
    }

    /// Set the architecture.
    pub fn with_arch(mut self, arch: Architecture) -> Self {
        self.arch = arch;
        self
    }

    /// Set the distributor name. Empty strings are treated as absent.
    pub fn with_org(mut self, org: impl Into<String>) -> Self {
        self.org = non_empty(org.into());
        self
    }

    /// Set the display name. Empty strings are treated as absent.
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = non_empty(display_name.into());
        self
    }

    /// Set the short name. Empty strings are treated as absent.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = non_empty(name.into());
        self
    }

    /// Set the environment directory.
    pub fn with_location(mut self, location: impl Into<PathBuf>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Set the workspace-relative search location.
    pub fn with_search_location(mut self, search_location: impl Into<PathBuf>) -> Self {
        self.search_location = Some(search_location.into());
        self
    }

    /// Set the file identity.
    pub fn with_file_info(mut self, file_info: FileInfo) -> Self {
        self.file_info = Some(file_info);
        self
    }

    /// Add a provenance tag, keeping order and skipping duplicates.
    pub fn with_source(mut self, source: EnvSource) -> Self {
        self.add_source(source);
        self
    }

    /// Add a provenance tag in place.
    pub fn add_source(&mut self, source: EnvSource) {
        if !self.sources.contains(&source) {
            self.sources.push(source);
        }
    }

    /// Path of the executable.
    pub fn executable(&self) -> &Path {
        &self.executable
    }
}

/// Map empty (or whitespace-only) strings to `None`.
pub fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_description_is_minimal() {
        let info = PythonEnvInfo::new(EnvKind::Unknown, "/usr/bin/python3");
        assert_eq!(info.kind, EnvKind::Unknown);
        assert!(info.version.is_unknown());
        assert_eq!(info.arch, Architecture::Unknown);
        assert!(info.org.is_none());
        assert!(info.sources.is_empty());
    }

    #[test]
    fn builder_sets_fields() {
        let info = PythonEnvInfo::new(EnvKind::Conda, "/envs/ml/bin/python")
            .with_version(PythonVersion::new(3, Some(8), Some(5)))
            .with_arch(Architecture::X64)
            .with_org("Anaconda, Inc.")
            .with_name("ml")
            .with_location("/envs/ml")
            .with_source(EnvSource::Conda);

        assert_eq!(info.version.to_string(), "3.8.5");
        assert_eq!(info.org.as_deref(), Some("Anaconda, Inc."));
        assert_eq!(info.name.as_deref(), Some("ml"));
        assert_eq!(info.location, Some(PathBuf::from("/envs/ml")));
        assert_eq!(info.sources, vec![EnvSource::Conda]);
    }

    #[test]
    fn empty_strings_are_absent() {
        let info = PythonEnvInfo::new(EnvKind::Venv, "/v/bin/python")
            .with_org("")
            .with_display_name("  ")
            .with_name("");
        assert!(info.org.is_none());
        assert!(info.display_name.is_none());
        assert!(info.name.is_none());
    }

    #[test]
    fn sources_have_no_duplicates() {
        let info = PythonEnvInfo::new(EnvKind::Conda, "/x/python")
            .with_source(EnvSource::Conda)
            .with_source(EnvSource::WindowsRegistry)
            .with_source(EnvSource::Conda);
        assert_eq!(
            info.sources,
            vec![EnvSource::Conda, EnvSource::WindowsRegistry]
        );
    }

    #[test]
    fn generic_kinds() {
        assert!(EnvKind::Unknown.is_generic());
        assert!(EnvKind::OtherGlobal.is_generic());
        assert!(!EnvKind::Conda.is_generic());
        assert!(!EnvKind::Venv.is_generic());
    }

    #[test]
    fn target_arch_maps_to_architecture() {
        assert_eq!(Architecture::from_target("x86"), Architecture::X86);
        assert_eq!(Architecture::from_target("x86_64"), Architecture::X64);
        assert_eq!(Architecture::from_target("aarch64"), Architecture::Unknown);
        assert_eq!(Architecture::from_target("arm"), Architecture::Unknown);
    }

    #[cfg(target_arch = "aarch64")]
    #[test]
    fn arm_host_is_not_reported_as_x64() {
        assert_eq!(Architecture::host(), Architecture::Unknown);
    }

    #[test]
    fn bitness_maps_to_architecture() {
        assert_eq!(Architecture::from_bitness("32bit"), Architecture::X86);
        assert_eq!(Architecture::from_bitness("64bit"), Architecture::X64);
        assert_eq!(Architecture::from_bitness("ARM64"), Architecture::X64);
        assert_eq!(Architecture::from_bitness(""), Architecture::Unknown);
        assert_eq!(Architecture::from_bitness("  "), Architecture::Unknown);
    }

    #[test]
    fn serializes_kind_as_snake_case() {
        let json = serde_json::to_string(&EnvKind::WindowsStore).unwrap();
        assert_eq!(json, "\"windows_store\"");
    }
}
