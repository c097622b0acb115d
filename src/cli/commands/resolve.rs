//! Resolve command implementation.
//!
//! The `pylocate resolve` command describes the environment of each
//! interpreter path it is given.

use std::path::{Path, PathBuf};

use crate::cli::args::ResolveArgs;
use crate::config::{load_config, LocatorConfig};
use crate::error::Result;
use crate::resolver::Resolver;
use crate::services::Services;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::display::{show_env, to_json};

/// The resolve command implementation.
pub struct ResolveCommand {
    project_root: PathBuf,
    config_path: Option<PathBuf>,
    args: ResolveArgs,
}

impl ResolveCommand {
    /// Create a new resolve command.
    pub fn new(project_root: &Path, config_path: Option<&Path>, args: ResolveArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_path: config_path.map(Path::to_path_buf),
            args,
        }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &ResolveArgs {
        &self.args
    }

    /// Configuration with command-line overrides applied.
    fn effective_config(&self) -> Result<LocatorConfig> {
        let mut config = load_config(&self.project_root, self.config_path.as_deref())?;

        if !self.args.workspace.is_empty() {
            config.workspace_folders = self
                .args
                .workspace
                .iter()
                .map(|p| std::path::absolute(p).unwrap_or_else(|_| p.clone()))
                .collect();
        }
        if let Some(timeout) = self.args.timeout {
            config.probe_timeout_secs = timeout;
        }

        config.validate()?;
        Ok(config)
    }
}

impl Command for ResolveCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = self.effective_config()?;
        let services = Services::from_config(&config, &self.project_root)?;
        let resolver =
            Resolver::new(services).with_include_all_architectures(config.include_all_architectures);

        let mut envs = Vec::new();
        let mut failed = 0;
        for (path, result) in self.args.paths.iter().zip(resolver.resolve_all(&self.args.paths)) {
            match result {
                Ok(info) => envs.push(info),
                Err(e) => {
                    ui.error(&format!("{}: {}", path.display(), e));
                    failed += 1;
                }
            }
        }

        if self.args.json {
            ui.data(&to_json(&envs)?);
        } else {
            for (i, info) in envs.iter().enumerate() {
                if i > 0 {
                    ui.message("");
                }
                show_env(ui, info);
            }
        }

        if failed > 0 {
            tracing::debug!("{} of {} paths failed", failed, self.args.paths.len());
            return Ok(CommandResult::failure(1));
        }
        Ok(CommandResult::success())
    }
}
