//! Config command implementation.
//!
//! The `pylocate config` command shows the effective configuration or
//! the JSON schema of the configuration file.

use std::path::{Path, PathBuf};

use crate::cli::args::ConfigArgs;
use crate::config::{load_config, ConfigPaths, LocatorConfig};
use crate::error::{LocateError, Result};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The config command implementation.
pub struct ConfigCommand {
    project_root: PathBuf,
    config_path: Option<PathBuf>,
    args: ConfigArgs,
}

impl ConfigCommand {
    /// Create a new config command.
    pub fn new(project_root: &Path, config_path: Option<&Path>, args: ConfigArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_path: config_path.map(Path::to_path_buf),
            args,
        }
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }
}

impl Command for ConfigCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        if self.args.schema {
            let schema = serde_json::to_string_pretty(&LocatorConfig::json_schema())
                .map_err(|e| LocateError::Other(e.into()))?;
            ui.data(&schema);
            return Ok(CommandResult::success());
        }

        let config = load_config(&self.project_root, self.config_path.as_deref())?;

        if self.args.json {
            let json =
                serde_json::to_string_pretty(&config).map_err(|e| LocateError::Other(e.into()))?;
            ui.data(&json);
            return Ok(CommandResult::success());
        }

        // Show config file path(s)
        let paths = ConfigPaths::discover(&self.project_root, self.config_path.as_deref());
        for path in paths.all() {
            ui.message(&format!("# {}", path.display()));
        }

        let yaml = serde_yaml::to_string(&config).map_err(|e| LocateError::Other(e.into()))?;
        ui.data(&yaml);
        Ok(CommandResult::success())
    }
}
