//! Registry command implementation.
//!
//! The `pylocate registry` command lists every interpreter registered
//! under `SOFTWARE\Python`.

use std::path::{Path, PathBuf};

use crate::cli::args::RegistryArgs;
use crate::config::load_config;
use crate::error::Result;
use crate::resolver::Resolver;
use crate::services::Services;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::display::{show_env, to_json};

/// The registry command implementation.
pub struct RegistryCommand {
    project_root: PathBuf,
    config_path: Option<PathBuf>,
    args: RegistryArgs,
}

impl RegistryCommand {
    /// Create a new registry command.
    pub fn new(project_root: &Path, config_path: Option<&Path>, args: RegistryArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_path: config_path.map(Path::to_path_buf),
            args,
        }
    }
}

impl Command for RegistryCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = load_config(&self.project_root, self.config_path.as_deref())?;
        let services = Services::from_config(&config, &self.project_root)?;
        let include_all = config.include_all_architectures && !self.args.native_only;
        let envs = Resolver::new(services)
            .with_include_all_architectures(include_all)
            .registry_envs();

        if self.args.json {
            ui.data(&to_json(&envs)?);
            return Ok(CommandResult::success());
        }

        if envs.is_empty() {
            ui.message("No interpreters registered.");
            return Ok(CommandResult::success());
        }

        for info in &envs {
            show_env(ui, info);
            ui.message("");
        }
        ui.success(&format!("{} registered interpreter(s)", envs.len()));
        Ok(CommandResult::success())
    }
}
