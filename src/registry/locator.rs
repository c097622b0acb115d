//! Lazy enumeration of registry interpreters as descriptions.

use std::collections::HashSet;
use std::path::Path;

use crate::info::PythonEnvInfo;
use crate::paths;
use crate::services::{FileSystem, Services};

use super::reader::read_interpreters;
use super::record::RegistryRecord;

/// Enumerates interpreters registered in the Windows registry.
///
/// # Example
///
/// ```
/// use pylocate::registry::RegistryLocator;
/// use pylocate::services::{NoRegistry, Services};
///
/// let locator = RegistryLocator::new(Services::host().with_registry(NoRegistry));
/// assert_eq!(locator.iter_envs().count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct RegistryLocator {
    services: Services,
    include_all_architectures: bool,
}

impl RegistryLocator {
    /// Create a locator that walks every registry view.
    pub fn new(services: Services) -> Self {
        Self {
            services,
            include_all_architectures: true,
        }
    }

    /// Whether to walk the 32-bit view on a native x86 host.
    pub fn include_all_architectures(mut self, include: bool) -> Self {
        self.include_all_architectures = include;
        self
    }

    /// Raw records, in walk order and with duplicates.
    pub fn records(&self) -> Vec<RegistryRecord> {
        read_interpreters(&self.services, self.include_all_architectures)
    }

    /// First record whose interpreter path names `executable`.
    pub fn find(&self, executable: &Path) -> Option<RegistryRecord> {
        self.records()
            .into_iter()
            .find(|r| paths::paths_equal(&r.interpreter_path, executable))
    }

    /// One description per distinct interpreter, built on demand.
    ///
    /// Each call reads the registry again. Entries that fail to build are
    /// logged and skipped.
    pub fn iter_envs(&self) -> RegistryEnvs<'_> {
        RegistryEnvs {
            records: self.records().into_iter(),
            fs: self.services.fs.as_ref(),
            seen: HashSet::new(),
        }
    }
}

/// Iterator returned by [`RegistryLocator::iter_envs`].
pub struct RegistryEnvs<'a> {
    records: std::vec::IntoIter<RegistryRecord>,
    fs: &'a dyn FileSystem,
    seen: HashSet<String>,
}

impl Iterator for RegistryEnvs<'_> {
    type Item = PythonEnvInfo;

    fn next(&mut self) -> Option<Self::Item> {
        for record in self.records.by_ref() {
            if !self.seen.insert(paths::normalize(&record.interpreter_path)) {
                tracing::debug!(
                    "Skipping duplicate registry entry {} ({} {})",
                    record.interpreter_path.display(),
                    record.hive,
                    record.view
                );
                continue;
            }
            match record.to_env_info(self.fs) {
                Ok(info) => return Some(info),
                Err(e) => tracing::warn!("Skipping registry entry: {}", e),
            }
        }
        None
    }
}
