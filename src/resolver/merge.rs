//! Reconciling a recognizer's description with registry data.
//!
//! The merge only ever adds information:
//!
//! - `kind` is kept unless it is `Unknown`, which becomes `OtherGlobal`
//! - the registry version is adopted only when strictly more complete,
//!   keeping the base `sys_version` when the registry has none
//! - the registry architecture is adopted whenever it is known
//! - `org` and `display_name` are filled only when missing
//! - sources are unioned in order
//!
//! Applying the same registry description twice changes nothing.

use crate::info::{Architecture, EnvKind, PythonEnvInfo};

/// Merge a registry description into `base`.
pub fn merge_registry_info(base: PythonEnvInfo, registry: &PythonEnvInfo) -> PythonEnvInfo {
    let mut merged = base;

    if merged.kind == EnvKind::Unknown {
        merged.kind = EnvKind::OtherGlobal;
    }

    if registry.version.is_more_complete_than(&merged.version) {
        let sys_version = merged.version.sys_version.take();
        merged.version = registry.version.clone();
        if merged.version.sys_version.is_none() {
            merged.version.sys_version = sys_version;
        }
    }

    if registry.arch != Architecture::Unknown {
        merged.arch = registry.arch;
    }

    if merged.org.is_none() {
        merged.org = registry.org.clone();
    }
    if merged.display_name.is_none() {
        merged.display_name = registry.display_name.clone();
    }

    for source in &registry.sources {
        merged.add_source(*source);
    }

    merged
}
