//! Shared display helpers for environment descriptions.
//!
//! Used by `resolve` and `registry` so both render [`PythonEnvInfo`]
//! the same way.

use crate::error::{LocateError, Result};
use crate::info::{EnvSource, PythonEnvInfo};
use crate::ui::UserInterface;

/// Human-readable label for a source.
pub fn source_label(source: EnvSource) -> &'static str {
    match source {
        EnvSource::Pyenv => "pyenv",
        EnvSource::Conda => "conda",
        EnvSource::PathEnvVar => "PATH",
        EnvSource::WindowsRegistry => "registry",
    }
}

/// Print one description as a header plus `key: value` lines.
///
/// Absent fields are skipped. File identity and sources only show in
/// verbose mode.
pub fn show_env(ui: &mut dyn UserInterface, info: &PythonEnvInfo) {
    ui.show_header(&info.executable.display().to_string());
    ui.key_value("kind", &info.kind.to_string());
    ui.key_value("version", &info.version.to_string());
    ui.key_value("arch", &info.arch.to_string());

    if let Some(name) = &info.name {
        ui.key_value("name", name);
    }
    if let Some(location) = &info.location {
        ui.key_value("location", &location.display().to_string());
    }
    if let Some(org) = &info.org {
        ui.key_value("org", org);
    }
    if let Some(display_name) = &info.display_name {
        ui.key_value("display name", display_name);
    }
    if let Some(search_location) = &info.search_location {
        ui.key_value("search", &search_location.display().to_string());
    }

    if !ui.output_mode().shows_details() {
        return;
    }

    if let Some(sys_version) = &info.version.sys_version {
        ui.key_value("sys version", sys_version);
    }
    if !info.sources.is_empty() {
        let sources: Vec<_> = info.sources.iter().map(|s| source_label(*s)).collect();
        ui.key_value("sources", &sources.join(", "));
    }
    if let Some(file_info) = &info.file_info {
        if let Some(mtime) = file_info.mtime {
            ui.key_value("modified", &mtime.to_rfc3339());
        }
        if let Some(ctime) = file_info.ctime {
            ui.key_value("created", &ctime.to_rfc3339());
        }
    }
}

/// Serialize descriptions as a pretty JSON array.
pub fn to_json(envs: &[PythonEnvInfo]) -> Result<String> {
    serde_json::to_string_pretty(envs).map_err(|e| LocateError::Other(e.into()))
}
