//! Python version parsing and completeness ordering.
//!
//! Interpreter versions arrive from many places (registry values, file
//! names, directory names, `pyvenv.cfg`), most of them decorated. The parser
//! extracts the first `major[.minor[.micro]]` token and keeps any release
//! qualifier that directly follows it.
//!
//! # Example
//!
//! ```
//! use pylocate::info::version::{parse_version, Completeness};
//!
//! let version = parse_version("3.9.0rc2").unwrap();
//! assert_eq!(version.completeness(), Completeness::Micro);
//! assert_eq!(version.release.as_deref(), Some("rc2"));
//!
//! let from_file = parse_version("python3.8.exe").unwrap();
//! assert_eq!(from_file.to_string(), "3.8");
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{LocateError, Result};

static VERSION_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(\d+)(?:\.(\d+))?(?:\.(\d+))?(?:[-_.]?((?:alpha|beta|candidate|final|dev|post|rc|a|b|c)(?:\.?\d+)?)\b)?",
    )
    .expect("version pattern is valid")
});

/// How much of a version is known.
///
/// Ordered from least to most informative, so `a > b` means `a` is
/// strictly more complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Completeness {
    Unknown,
    Major,
    Minor,
    Micro,
}

/// A structured Python version.
///
/// [`PythonVersion::unknown`] is the sentinel for "no version information";
/// it is a regular value, so comparisons never special-case absence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PythonVersion {
    pub major: Option<u32>,
    pub minor: Option<u32>,
    pub micro: Option<u32>,
    /// Release qualifier following the numbers (`rc2`, `final.0`, `dev`).
    pub release: Option<String>,
    /// Raw `sys.version`-style tag reported by the interpreter's tooling.
    pub sys_version: Option<String>,
}

impl PythonVersion {
    /// The unknown-version sentinel.
    pub const fn unknown() -> Self {
        Self {
            major: None,
            minor: None,
            micro: None,
            release: None,
            sys_version: None,
        }
    }

    /// Build a version from numeric components.
    pub fn new(major: u32, minor: Option<u32>, micro: Option<u32>) -> Self {
        Self {
            major: Some(major),
            minor,
            micro: minor.and(micro),
            ..Self::unknown()
        }
    }

    /// Attach a `sys.version` tag.
    pub fn with_sys_version(mut self, sys_version: impl Into<String>) -> Self {
        self.sys_version = Some(sys_version.into());
        self
    }

    /// Whether this is the unknown sentinel.
    pub fn is_unknown(&self) -> bool {
        self.major.is_none()
    }

    /// How many numeric components are known.
    pub fn completeness(&self) -> Completeness {
        match (self.major, self.minor, self.micro) {
            (None, _, _) => Completeness::Unknown,
            (Some(_), None, _) => Completeness::Major,
            (Some(_), Some(_), None) => Completeness::Minor,
            (Some(_), Some(_), Some(_)) => Completeness::Micro,
        }
    }

    /// Whether `self` carries strictly more numeric detail than `other`.
    pub fn is_more_complete_than(&self, other: &PythonVersion) -> bool {
        self.completeness() > other.completeness()
    }
}

impl fmt::Display for PythonVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(major) = self.major else {
            return write!(f, "unknown");
        };
        write!(f, "{}", major)?;
        if let Some(minor) = self.minor {
            write!(f, ".{}", minor)?;
            if let Some(micro) = self.micro {
                write!(f, ".{}", micro)?;
            }
        }
        if let Some(release) = &self.release {
            write!(f, "{}", release)?;
        }
        Ok(())
    }
}

impl FromStr for PythonVersion {
    type Err = LocateError;

    fn from_str(s: &str) -> Result<Self> {
        parse_version(s)
    }
}

/// Parse free-form text into a [`PythonVersion`].
///
/// Returns [`LocateError::VersionParse`] when no numeric token exists.
/// Callers that can live without a version use [`parse_version_or_unknown`].
pub fn parse_version(text: &str) -> Result<PythonVersion> {
    let normalized = text.trim().to_lowercase();
    let parse_err = || LocateError::VersionParse {
        input: text.to_string(),
    };

    let caps = VERSION_TOKEN.captures(&normalized).ok_or_else(parse_err)?;
    let component = |idx: usize| -> Result<Option<u32>> {
        caps.get(idx)
            .map(|m| m.as_str().parse::<u32>().map_err(|_| parse_err()))
            .transpose()
    };

    let major = component(1)?.ok_or_else(parse_err)?;
    let minor = component(2)?;
    let micro = component(3)?;

    let mut version = PythonVersion::new(major, minor, micro);
    version.release = caps.get(4).map(|m| m.as_str().to_string());
    Ok(version)
}

/// Parse a version, substituting the unknown sentinel on failure.
pub fn parse_version_or_unknown(text: &str) -> PythonVersion {
    match parse_version(text) {
        Ok(version) => version,
        Err(e) => {
            tracing::trace!("{}", e);
            PythonVersion::unknown()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_version() {
        let v = parse_version("3.9.1").unwrap();
        assert_eq!(v, PythonVersion::new(3, Some(9), Some(1)));
        assert_eq!(v.completeness(), Completeness::Micro);
    }

    #[test]
    fn keeps_release_candidate_qualifier() {
        let v = parse_version("3.9.0rc2").unwrap();
        assert_eq!(v.micro, Some(0));
        assert_eq!(v.release.as_deref(), Some("rc2"));
        assert_eq!(v.to_string(), "3.9.0rc2");
    }

    #[test]
    fn extracts_version_from_file_name() {
        let v = parse_version("python3.8.exe").unwrap();
        assert_eq!(v, PythonVersion::new(3, Some(8), None));
        assert!(v.release.is_none());
    }

    #[test]
    fn extension_is_not_a_qualifier() {
        let v = parse_version("python3.10.bat").unwrap();
        assert_eq!(v.to_string(), "3.10");
    }

    #[test]
    fn keeps_version_info_tail() {
        let v = parse_version("3.9.1.final.0").unwrap();
        assert_eq!(v.micro, Some(1));
        assert_eq!(v.release.as_deref(), Some("final.0"));
    }

    #[test]
    fn dev_suffix_after_dash() {
        let v = parse_version("3.10-dev").unwrap();
        assert_eq!(v.minor, Some(10));
        assert_eq!(v.release.as_deref(), Some("dev"));
    }

    #[test]
    fn ignores_fourth_component() {
        let v = parse_version("3.9.1.2").unwrap();
        assert_eq!(v, PythonVersion::new(3, Some(9), Some(1)));
    }

    #[test]
    fn whitespace_and_case_do_not_matter() {
        assert_eq!(
            parse_version("  3.9.0RC2 ").unwrap(),
            parse_version("3.9.0rc2").unwrap()
        );
    }

    #[test]
    fn no_digits_is_an_error() {
        let err = parse_version("python.exe").unwrap_err();
        assert!(matches!(err, LocateError::VersionParse { .. }));
    }

    #[test]
    fn overflowing_component_is_an_error() {
        assert!(parse_version("99999999999999").is_err());
    }

    #[test]
    fn or_unknown_substitutes_sentinel() {
        assert!(parse_version_or_unknown("").is_unknown());
        assert_eq!(parse_version_or_unknown("3.8").minor, Some(8));
    }

    #[test]
    fn completeness_ordering() {
        let rc = parse_version("3.9.0rc2").unwrap();
        let minor = parse_version("3.8").unwrap();
        let major = parse_version("3").unwrap();
        assert!(rc.is_more_complete_than(&minor));
        assert!(minor.is_more_complete_than(&major));
        assert!(major.is_more_complete_than(&PythonVersion::unknown()));
        assert!(!minor.is_more_complete_than(&parse_version("2.7").unwrap()));
    }

    #[test]
    fn micro_without_minor_is_dropped() {
        let v = PythonVersion::new(3, None, Some(1));
        assert_eq!(v.completeness(), Completeness::Major);
    }

    #[test]
    fn unknown_displays_as_unknown() {
        assert_eq!(PythonVersion::unknown().to_string(), "unknown");
    }

    #[test]
    fn from_str_delegates_to_parser() {
        let v: PythonVersion = "3.11.4".parse().unwrap();
        assert_eq!(v.micro, Some(4));
    }
}
