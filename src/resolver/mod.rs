//! Interpreter resolution.
//!
//! [`Resolver::resolve_env`] turns an interpreter path into a single
//! reconciled [`PythonEnvInfo`]:
//!
//! 1. the first recognizing channel builds the initial description
//!    (see [`crate::recognizers`])
//! 2. the registry is searched for the same interpreter
//! 3. when found, registry data is merged in (see [`merge`])
//!
//! # Example
//!
//! ```
//! use pylocate::resolver::Resolver;
//! use pylocate::services::{NoRegistry, Services};
//! use pylocate::info::EnvKind;
//!
//! let resolver = Resolver::new(Services::host().with_registry(NoRegistry));
//! let info = resolver.resolve_env("/nonexistent/python3").unwrap();
//! assert_eq!(info.kind, EnvKind::Unknown);
//! assert_eq!(info.name.as_deref(), Some("nonexistent"));
//! ```

pub mod merge;

use std::path::Path;
use std::thread;

use tracing::Dispatch;

pub use merge::merge_registry_info;

use crate::error::{LocateError, Result};
use crate::info::PythonEnvInfo;
use crate::recognizers;
use crate::registry::RegistryLocator;
use crate::services::Services;

/// Resolves interpreter paths into descriptions.
///
/// Holds only shared, read-only state; one resolver can serve any number
/// of concurrent calls.
#[derive(Debug, Clone)]
pub struct Resolver {
    services: Services,
    include_all_architectures: bool,
    dispatch: Option<Dispatch>,
}

impl Resolver {
    /// Create a resolver over the given services.
    pub fn new(services: Services) -> Self {
        Self {
            services,
            include_all_architectures: true,
            dispatch: None,
        }
    }

    /// Route this resolver's diagnostics to `dispatch` instead of the
    /// global subscriber.
    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = Some(dispatch);
        self
    }

    /// Whether to read the 32-bit registry view on a native x86 host.
    pub fn with_include_all_architectures(mut self, include: bool) -> Self {
        self.include_all_architectures = include;
        self
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    /// Registry locator using this resolver's services.
    pub fn registry_locator(&self) -> RegistryLocator {
        RegistryLocator::new(self.services.clone())
            .include_all_architectures(self.include_all_architectures)
    }

    /// Resolve one interpreter path.
    ///
    /// Fails only for an empty path; every other problem degrades the
    /// description instead.
    pub fn resolve_env(&self, path: impl AsRef<Path>) -> Result<PythonEnvInfo> {
        let path = path.as_ref();
        self.in_scope(|| self.resolve_in_scope(path))
    }

    /// Resolve several paths concurrently; results are in input order.
    ///
    /// Paths are split into contiguous chunks, one worker thread per chunk,
    /// with no more workers than the host's available parallelism.
    pub fn resolve_all<P: AsRef<Path> + Sync>(&self, paths: &[P]) -> Vec<Result<PythonEnvInfo>> {
        if paths.is_empty() {
            return Vec::new();
        }
        let chunk_size = chunk_size(paths.len());

        thread::scope(|scope| {
            let handles: Vec<_> = paths
                .chunks(chunk_size)
                .map(|chunk| {
                    let handle = scope.spawn(move || {
                        chunk
                            .iter()
                            .map(|path| self.resolve_env(path))
                            .collect::<Vec<_>>()
                    });
                    (chunk.len(), handle)
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|(len, handle)| {
                    handle.join().unwrap_or_else(|_| {
                        (0..len)
                            .map(|_| {
                                Err(LocateError::Other(anyhow::anyhow!(
                                    "Resolution thread panicked"
                                )))
                            })
                            .collect()
                    })
                })
                .collect()
        })
    }

    /// Every interpreter registered in the registry, deduplicated.
    pub fn registry_envs(&self) -> Vec<PythonEnvInfo> {
        self.in_scope(|| self.registry_locator().iter_envs().collect())
    }

    fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        match &self.dispatch {
            Some(dispatch) => tracing::dispatcher::with_default(dispatch, f),
            None => f(),
        }
    }

    fn resolve_in_scope(&self, path: &Path) -> Result<PythonEnvInfo> {
        if path.to_string_lossy().trim().is_empty() {
            return Err(LocateError::InvalidPath {
                reason: "path is empty".to_string(),
            });
        }
        tracing::debug!("Resolving {}", path.display());

        let mut base = recognizers::identify(path, &self.services);
        if base.file_info.is_none() {
            match self.services.fs.stat_file(path) {
                Ok(file_info) => base.file_info = Some(file_info),
                Err(e) => tracing::trace!("{}", e),
            }
        }

        let Some(record) = self.registry_locator().find(path) else {
            tracing::debug!("No registry entry for {}", path.display());
            return Ok(base);
        };

        match record.to_env_info(self.services.fs.as_ref()) {
            Ok(registry) => {
                tracing::debug!(
                    "Merging registry entry {} ({} {})",
                    record.interpreter_path.display(),
                    record.hive,
                    record.view
                );
                Ok(merge_registry_info(base, &registry))
            }
            Err(e) => {
                tracing::warn!("Ignoring registry entry: {}", e);
                Ok(base)
            }
        }
    }
}

/// Paths per worker so that `len` paths need at most one thread per core.
fn chunk_size(len: usize) -> usize {
    let workers = thread::available_parallelism().map_or(1, |n| n.get());
    len.div_ceil(workers).max(1)
}
