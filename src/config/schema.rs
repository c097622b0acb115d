//! Configuration schema for pylocate.
//!
//! The struct maps directly to the YAML configuration file format.

use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{LocateError, Result};

/// Root configuration structure for `.pylocate.yml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct LocatorConfig {
    /// Walk the 32-bit registry view on native x86 hosts too
    #[serde(default = "default_true")]
    pub include_all_architectures: bool,

    /// Timeout for external tool probes such as `conda info`, in seconds
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,

    /// Conda executable used when `CONDA_EXE` is unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conda_command: Option<String>,

    /// pyenv root used when `PYENV_ROOT` is unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pyenv_root: Option<PathBuf>,

    /// Workspace folders; environments inside them get a search location
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub workspace_folders: Vec<PathBuf>,

    /// Registry snapshot (YAML or JSON) read instead of the live registry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_snapshot: Option<PathBuf>,
}

fn default_true() -> bool {
    true
}

fn default_probe_timeout() -> u64 {
    15
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            include_all_architectures: true,
            probe_timeout_secs: default_probe_timeout(),
            conda_command: None,
            pyenv_root: None,
            workspace_folders: Vec::new(),
            registry_snapshot: None,
        }
    }
}

impl LocatorConfig {
    /// Check values serde cannot.
    pub fn validate(&self) -> Result<()> {
        if self.probe_timeout_secs == 0 {
            return Err(LocateError::ConfigValidationError {
                message: "probe_timeout_secs must be greater than 0".to_string(),
            });
        }
        if self
            .conda_command
            .as_deref()
            .is_some_and(|c| c.trim().is_empty())
        {
            return Err(LocateError::ConfigValidationError {
                message: "conda_command must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// JSON schema of the configuration file.
    pub fn json_schema() -> serde_json::Value {
        serde_json::to_value(schemars::schema_for!(LocatorConfig)).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = LocatorConfig::default();
        assert!(config.include_all_architectures);
        assert_eq!(config.probe_timeout_secs, 15);
        assert!(config.workspace_folders.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_yaml_gives_defaults() {
        let config: LocatorConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, LocatorConfig::default());
    }

    #[test]
    fn parses_all_keys() {
        let yaml = r#"
include_all_architectures: false
probe_timeout_secs: 5
conda_command: mamba
pyenv_root: /opt/pyenv
workspace_folders:
  - /work/app
registry_snapshot: registry.yml
"#;
        let config: LocatorConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(!config.include_all_architectures);
        assert_eq!(config.probe_timeout_secs, 5);
        assert_eq!(config.conda_command.as_deref(), Some("mamba"));
        assert_eq!(config.pyenv_root, Some(PathBuf::from("/opt/pyenv")));
        assert_eq!(config.workspace_folders, vec![PathBuf::from("/work/app")]);
        assert_eq!(config.registry_snapshot, Some(PathBuf::from("registry.yml")));
    }

    #[test]
    fn zero_timeout_is_invalid() {
        let config = LocatorConfig {
            probe_timeout_secs: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(LocateError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn blank_conda_command_is_invalid() {
        let config = LocatorConfig {
            conda_command: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let config: LocatorConfig = serde_yaml::from_str("future_key: 1").unwrap();
        assert_eq!(config, LocatorConfig::default());
    }

    #[test]
    fn schema_lists_properties() {
        let schema = LocatorConfig::json_schema();
        let properties = &schema["properties"];
        assert!(properties.get("probe_timeout_secs").is_some());
        assert!(properties.get("registry_snapshot").is_some());
    }
}
