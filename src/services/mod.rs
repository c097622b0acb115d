//! Machine access consumed by recognizers and the registry reader.
//!
//! Everything that touches the host (files, processes, environment
//! variables, the registry) goes through a trait object held by
//! [`Services`], so tests swap in fakes instead of mutating globals.
//!
//! # Modules
//!
//! - [`fs`] - Filesystem checks and file identity
//! - [`process`] - External program execution with timeouts
//! - [`registry`] - Windows registry access
//! - [`workspace`] - Workspace folder enumeration

pub mod fs;
pub mod process;
pub mod registry;
pub mod workspace;

use std::collections::HashMap;
use std::env::VarError;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

pub use fs::{FileSystem, HostFileSystem};
pub use process::{CommandRunner, MockRunner, ProcessOutput, ProcessRunner};
pub use registry::{
    InMemoryRegistry, NoRegistry, RegExeRegistry, RegistryHive, RegistryService, RegistryValue,
    RegistryView,
};
pub use workspace::{StaticWorkspace, WorkspaceFolders};

use crate::config::LocatorConfig;
use crate::error::Result;
use crate::info::Architecture;

/// Environment variable lookup.
pub type EnvLookup = Arc<dyn Fn(&str) -> std::result::Result<String, VarError> + Send + Sync>;

/// Default timeout for external tool probes.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(15);

/// Shared, read-only handles to the host.
#[derive(Clone)]
pub struct Services {
    pub fs: Arc<dyn FileSystem>,
    pub process: Arc<dyn ProcessRunner>,
    pub workspace: Arc<dyn WorkspaceFolders>,
    pub registry: Arc<dyn RegistryService>,
    pub env: EnvLookup,
    pub host_arch: Architecture,
    pub probe_timeout: Duration,
    /// Fallback conda executable when `CONDA_EXE` is unset.
    pub conda_command: Option<String>,
    /// Fallback pyenv root when `PYENV_ROOT` is unset.
    pub pyenv_root: Option<PathBuf>,
    pub home_dir: Option<PathBuf>,
}

impl Services {
    /// Services backed by the real machine.
    ///
    /// The registry is read through `reg.exe` on Windows and is empty
    /// everywhere else.
    pub fn host() -> Self {
        let process: Arc<dyn ProcessRunner> = Arc::new(CommandRunner);
        let registry: Arc<dyn RegistryService> = if cfg!(windows) {
            Arc::new(RegExeRegistry::new(process.clone(), DEFAULT_PROBE_TIMEOUT))
        } else {
            Arc::new(NoRegistry)
        };

        Self {
            fs: Arc::new(HostFileSystem),
            process,
            workspace: Arc::new(StaticWorkspace::default()),
            registry,
            env: Arc::new(|name: &str| std::env::var(name)),
            host_arch: Architecture::host(),
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            conda_command: None,
            pyenv_root: None,
            home_dir: dirs::home_dir(),
        }
    }

    /// Host services adjusted by a loaded configuration.
    ///
    /// Relative paths in the configuration resolve against `project_root`.
    pub fn from_config(config: &LocatorConfig, project_root: &Path) -> Result<Self> {
        let timeout = Duration::from_secs(config.probe_timeout_secs);
        let mut services = Self::host().with_probe_timeout(timeout);

        if cfg!(windows) && config.registry_snapshot.is_none() {
            services.registry = Arc::new(RegExeRegistry::new(services.process.clone(), timeout));
        }
        if let Some(snapshot) = &config.registry_snapshot {
            let path = resolve_relative(project_root, snapshot);
            tracing::debug!("Loading registry snapshot from {}", path.display());
            services.registry = Arc::new(InMemoryRegistry::load(&path)?);
        }

        services.workspace = Arc::new(StaticWorkspace::new(
            config
                .workspace_folders
                .iter()
                .map(|f| resolve_relative(project_root, f))
                .collect(),
        ));
        services.conda_command = config.conda_command.clone();
        services.pyenv_root = config
            .pyenv_root
            .as_ref()
            .map(|p| resolve_relative(project_root, p));

        Ok(services)
    }

    pub fn with_fs(mut self, fs: impl FileSystem + 'static) -> Self {
        self.fs = Arc::new(fs);
        self
    }

    pub fn with_process(mut self, process: impl ProcessRunner + 'static) -> Self {
        self.process = Arc::new(process);
        self
    }

    pub fn with_workspace(mut self, workspace: impl WorkspaceFolders + 'static) -> Self {
        self.workspace = Arc::new(workspace);
        self
    }

    pub fn with_registry(mut self, registry: impl RegistryService + 'static) -> Self {
        self.registry = Arc::new(registry);
        self
    }

    /// Replace environment variable lookup.
    pub fn with_env_fn<F>(mut self, env: F) -> Self
    where
        F: Fn(&str) -> std::result::Result<String, VarError> + Send + Sync + 'static,
    {
        self.env = Arc::new(env);
        self
    }

    /// Use a fixed set of environment variables; everything else is unset.
    pub fn with_env_vars<I, K, V>(self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.with_env_fn(move |name| vars.get(name).cloned().ok_or(VarError::NotPresent))
    }

    pub fn with_host_arch(mut self, arch: Architecture) -> Self {
        self.host_arch = arch;
        self
    }

    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    pub fn with_conda_command(mut self, command: impl Into<String>) -> Self {
        self.conda_command = Some(command.into());
        self
    }

    pub fn with_pyenv_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.pyenv_root = Some(root.into());
        self
    }

    pub fn with_home_dir(mut self, home: impl Into<PathBuf>) -> Self {
        self.home_dir = Some(home.into());
        self
    }

    /// Look up an environment variable; empty values count as unset.
    pub fn env_var(&self, name: &str) -> Option<String> {
        (self.env)(name).ok().filter(|v| !v.trim().is_empty())
    }
}

impl Default for Services {
    fn default() -> Self {
        Self::host()
    }
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services")
            .field("host_arch", &self.host_arch)
            .field("probe_timeout", &self.probe_timeout)
            .field("conda_command", &self.conda_command)
            .field("pyenv_root", &self.pyenv_root)
            .field("home_dir", &self.home_dir)
            .finish_non_exhaustive()
    }
}

fn resolve_relative(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
