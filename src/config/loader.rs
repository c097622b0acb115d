//! Configuration file discovery and loading.

use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::Value;

use crate::config::merger::merge_layers;
use crate::config::schema::LocatorConfig;
use crate::error::{LocateError, Result};

/// Project config file name.
pub const PROJECT_CONFIG: &str = ".pylocate.yml";

/// Configuration files in merge order (later overrides earlier).
///
/// 1. User global config (`<config dir>/pylocate/config.yml`)
/// 2. Project config (`<project>/.pylocate.yml`)
/// 3. Explicit `--config` file
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    pub user_global: Option<PathBuf>,
    pub project: Option<PathBuf>,
    pub explicit: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover config files for the given project root.
    ///
    /// An explicit file is kept even when missing so loading can report it.
    pub fn discover(project_root: &Path, explicit: Option<&Path>) -> Self {
        Self {
            user_global: Self::find_user_global(),
            project: existing(project_root.join(PROJECT_CONFIG)),
            explicit: explicit.map(Path::to_path_buf),
        }
    }

    fn find_user_global() -> Option<PathBuf> {
        existing(dirs::config_dir()?.join("pylocate").join("config.yml"))
    }

    /// All paths in merge order.
    pub fn all(&self) -> Vec<&PathBuf> {
        [&self.user_global, &self.project, &self.explicit]
            .into_iter()
            .flatten()
            .collect()
    }
}

fn existing(path: PathBuf) -> Option<PathBuf> {
    path.exists().then_some(path)
}

/// Load a config file as a raw YAML value for merging.
pub fn load_config_value(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            LocateError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            LocateError::Io(e)
        }
    })?;

    serde_yaml::from_str(&content).map_err(|e| LocateError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Parse YAML content into a validated [`LocatorConfig`].
pub fn parse_config(content: &str, source_path: &Path) -> Result<LocatorConfig> {
    let value: Value = serde_yaml::from_str(content).map_err(|e| LocateError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })?;
    from_value(merge_layers(&[value]), source_path)
}

/// Load and merge the given config files.
pub fn load_from_paths(paths: &ConfigPaths, report_path: &Path) -> Result<LocatorConfig> {
    let mut layers = Vec::new();
    for path in paths.all() {
        tracing::debug!("Loading config layer {}", path.display());
        layers.push(load_config_value(path)?);
    }
    from_value(merge_layers(&layers), report_path)
}

/// Discover, merge and validate configuration for a project.
///
/// With no config files at all, the defaults apply.
pub fn load_config(project_root: &Path, explicit: Option<&Path>) -> Result<LocatorConfig> {
    let paths = ConfigPaths::discover(project_root, explicit);
    let report_path = explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| project_root.join(PROJECT_CONFIG));
    load_from_paths(&paths, &report_path)
}

fn from_value(value: Value, path: &Path) -> Result<LocatorConfig> {
    let config: LocatorConfig =
        serde_yaml::from_value(value).map_err(|e| LocateError::ConfigParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    config.validate()?;
    Ok(config)
}
