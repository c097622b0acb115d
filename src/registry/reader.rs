//! Walks `\SOFTWARE\Python` across hives and views.

use std::path::PathBuf;

use crate::error::Result;
use crate::info::{non_empty, Architecture};
use crate::paths;
use crate::services::registry::{RegistryHive, RegistryValue, RegistryView};
use crate::services::Services;

use super::record::RegistryRecord;

/// Root key holding one subkey per distributing company.
pub const PYTHON_ROOT: &str = r"\SOFTWARE\Python";

const INSTALL_PATH_KEY: &str = "InstallPath";

/// Views to walk on this host.
///
/// The 32-bit view is skipped on a native x86 host unless all
/// architectures are requested.
pub fn views(host_arch: Architecture, include_all_architectures: bool) -> Vec<RegistryView> {
    if host_arch == Architecture::X86 && !include_all_architectures {
        vec![RegistryView::X64]
    } else {
        vec![RegistryView::X64, RegistryView::X86]
    }
}

/// Read every registered interpreter.
///
/// Order is hive (machine, then user), then view (64-bit, then 32-bit),
/// then registry enumeration order. Duplicates across scopes are kept.
/// A branch that fails to read is logged and skipped.
pub fn read_interpreters(services: &Services, include_all_architectures: bool) -> Vec<RegistryRecord> {
    let mut records = Vec::new();

    for hive in RegistryHive::ALL {
        for view in views(services.host_arch, include_all_architectures) {
            if let Err(e) = read_companies(services, hive, view, &mut records) {
                tracing::warn!("Skipping registry branch {} ({}): {}", hive, view, e);
            }
        }
    }

    tracing::debug!("Found {} registry interpreter(s)", records.len());
    records
}

fn read_companies(
    services: &Services,
    hive: RegistryHive,
    view: RegistryView,
    records: &mut Vec<RegistryRecord>,
) -> Result<()> {
    let companies = services.registry.list_subkeys(hive, view, PYTHON_ROOT)?;

    for company_key in companies {
        if let Err(e) = read_company(services, hive, view, &company_key, records) {
            tracing::warn!("Skipping registry company {}{}: {}", hive, company_key, e);
        }
    }
    Ok(())
}

fn read_company(
    services: &Services,
    hive: RegistryHive,
    view: RegistryView,
    company_key: &str,
    records: &mut Vec<RegistryRecord>,
) -> Result<()> {
    let registry = &services.registry;
    let org = paths::file_name(&PathBuf::from(company_key));
    let company_values = registry.list_values(hive, view, company_key)?;
    let company_display = value_of(&company_values, "DisplayName");

    for tag_key in registry.list_subkeys(hive, view, company_key)? {
        match read_tag(services, hive, view, &tag_key) {
            Ok(Some(mut record)) => {
                record.distro_org_name = org.clone();
                if record.company_display_name.is_none() {
                    record.company_display_name = company_display.clone();
                }
                tracing::trace!("Registry interpreter {}", record.interpreter_path.display());
                records.push(record);
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("Skipping registry entry {}{}: {}", hive, tag_key, e),
        }
    }
    Ok(())
}

fn read_tag(
    services: &Services,
    hive: RegistryHive,
    view: RegistryView,
    tag_key: &str,
) -> Result<Option<RegistryRecord>> {
    let registry = &services.registry;

    let install_key = registry
        .list_subkeys(hive, view, tag_key)?
        .into_iter()
        .find(|k| {
            paths::file_name(&PathBuf::from(k))
                .is_some_and(|name| name.eq_ignore_ascii_case(INSTALL_PATH_KEY))
        });
    let Some(install_key) = install_key else {
        tracing::debug!("Skipping {}{}: no {} subkey", hive, tag_key, INSTALL_PATH_KEY);
        return Ok(None);
    };

    let install_values = registry.list_values(hive, view, &install_key)?;
    let interpreter_path = match value_of(&install_values, "ExecutablePath") {
        Some(exe) => PathBuf::from(exe),
        None => match value_of(&install_values, "") {
            Some(dir) => paths::join(&PathBuf::from(dir), "python.exe"),
            None => {
                tracing::debug!("Skipping {}{}: no interpreter path", hive, install_key);
                return Ok(None);
            }
        },
    };

    let tag_values = registry.list_values(hive, view, tag_key)?;
    let mut record = RegistryRecord::new(interpreter_path, hive, view);
    record.version_str = value_of(&tag_values, "Version");
    record.sys_version_str = value_of(&tag_values, "SysVersion");
    record.bitness_str = value_of(&tag_values, "SysArchitecture");
    record.company_display_name = value_of(&tag_values, "DisplayName");

    Ok(Some(record))
}

fn value_of(values: &[RegistryValue], name: &str) -> Option<String> {
    values
        .iter()
        .find(|v| v.name.eq_ignore_ascii_case(name))
        .and_then(|v| non_empty(v.value.clone()))
}
