//! Conda environments.
//!
//! A conda environment is any prefix containing a `conda-meta`
//! directory. The conda tool itself (`conda info --json`) is asked which
//! environments it manages; when it cannot answer, the marker alone
//! still identifies the environment.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{LocateError, Result};
use crate::info::{parse_version_or_unknown, EnvKind, EnvSource, PythonEnvInfo, PythonVersion};
use crate::paths;
use crate::services::Services;

use super::env_dir;

/// Distributor name for environments the conda tool manages.
pub const ANACONDA_COMPANY: &str = "Anaconda, Inc.";

const CONDA_META: &str = "conda-meta";

/// Subset of `conda info --json`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CondaInfo {
    #[serde(default)]
    pub conda_version: Option<String>,
    #[serde(default)]
    pub python_version: Option<String>,
    #[serde(rename = "sys.version", default)]
    pub sys_version: Option<String>,
    #[serde(rename = "sys.prefix", default)]
    pub sys_prefix: Option<PathBuf>,
    #[serde(default)]
    pub root_prefix: Option<PathBuf>,
    #[serde(default)]
    pub envs: Vec<PathBuf>,
}

impl CondaInfo {
    /// Whether conda lists `prefix` as one of its environments.
    pub fn knows(&self, prefix: &Path) -> bool {
        self.is_root(prefix) || self.envs.iter().any(|e| paths::paths_equal(e, prefix))
    }

    /// Whether `prefix` is the base environment.
    pub fn is_root(&self, prefix: &Path) -> bool {
        self.root_prefix
            .as_deref()
            .is_some_and(|root| paths::paths_equal(root, prefix))
    }
}

/// Conda prefix of `executable`, if it has a `conda-meta` directory.
pub fn conda_prefix(executable: &Path, services: &Services) -> Option<PathBuf> {
    let prefix = env_dir(executable)?;
    services
        .fs
        .is_dir(&paths::join(&prefix, CONDA_META))
        .then_some(prefix)
}

/// Python version recorded in `conda-meta/python-<version>-<build>.json`.
pub fn conda_meta_version(prefix: &Path, services: &Services) -> PythonVersion {
    let meta = paths::join(prefix, CONDA_META);
    let entries = match services.fs.list_dir(&meta) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::trace!("Cannot list {}: {}", meta.display(), e);
            return PythonVersion::unknown();
        }
    };

    entries
        .iter()
        .filter(|name| name.ends_with(".json"))
        .filter_map(|name| name.strip_prefix("python-"))
        .find(|rest| rest.starts_with(|c: char| c.is_ascii_digit()))
        .map(parse_version_or_unknown)
        .unwrap_or_else(PythonVersion::unknown)
}

/// Conda executable: `CONDA_EXE`, then the configured command, then `conda`.
pub fn conda_command(services: &Services) -> String {
    services
        .env_var("CONDA_EXE")
        .or_else(|| services.conda_command.clone())
        .unwrap_or_else(|| "conda".to_string())
}

/// Run `conda info --json` and parse its output.
pub fn conda_info(services: &Services) -> Result<CondaInfo> {
    let command = conda_command(services);
    let stdout = services
        .process
        .run_checked(&command, &["info", "--json"], services.probe_timeout)?;
    serde_json::from_str(&stdout).map_err(|e| {
        LocateError::Other(anyhow::anyhow!("Invalid output from {} info --json: {}", command, e))
    })
}

/// Describe `executable` if it lives in a conda prefix.
pub fn resolve(executable: &Path, services: &Services) -> Option<PythonEnvInfo> {
    let prefix = conda_prefix(executable, services)?;

    let mut info = PythonEnvInfo::new(EnvKind::Conda, executable)
        .with_version(conda_meta_version(&prefix, services))
        .with_location(&prefix);
    info.name = paths::file_name(&prefix);

    match conda_info(services) {
        Ok(conda) => enrich(&mut info, &prefix, &conda),
        Err(e) => tracing::debug!("Conda tool unavailable, using marker only: {}", e),
    }

    Some(info)
}

fn enrich(info: &mut PythonEnvInfo, prefix: &Path, conda: &CondaInfo) {
    if !conda.knows(prefix) {
        tracing::debug!("Conda does not list {}", prefix.display());
        return;
    }

    if conda.is_root(prefix) {
        info.name = Some("base".to_string());
    }
    info.org = Some(ANACONDA_COMPANY.to_string());
    info.add_source(EnvSource::Conda);

    let is_sys_prefix = conda
        .sys_prefix
        .as_deref()
        .is_some_and(|p| paths::paths_equal(p, prefix));
    if is_sys_prefix {
        info.version.sys_version = conda.sys_version.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{MockRunner, ProcessOutput};
    use std::fs;
    use tempfile::TempDir;

    fn conda_env(root: &Path, meta_files: &[&str]) -> PathBuf {
        fs::create_dir_all(root.join("bin")).unwrap();
        fs::create_dir_all(root.join(CONDA_META)).unwrap();
        for file in meta_files {
            fs::write(root.join(CONDA_META).join(file), "{}").unwrap();
        }
        let exe = root.join("bin").join("python");
        fs::write(&exe, "").unwrap();
        exe
    }

    fn info_json(root_prefix: &Path, envs: &[&PathBuf], sys_prefix: &str) -> String {
        serde_json::json!({
            "conda_version": "4.8.0",
            "python_version": "3.9.0",
            "sys.version": "3.9.0",
            "sys.prefix": sys_prefix,
            "root_prefix": root_prefix,
            "envs": envs,
        })
        .to_string()
    }

    fn services(runner: MockRunner) -> Services {
        Services::host()
            .with_env_vars(Vec::<(String, String)>::new())
            .with_process(runner)
    }

    #[test]
    fn base_env_known_to_conda() {
        let temp = TempDir::new().unwrap();
        let prefix = temp.path().join("conda2");
        let exe = conda_env(&prefix, &[]);
        let runner = MockRunner::new().with_response(
            "conda info --json",
            ProcessOutput::success(info_json(&prefix, &[&prefix], "/some/env")),
        );

        let info = resolve(&exe, &services(runner)).unwrap();

        assert_eq!(info.kind, EnvKind::Conda);
        assert_eq!(info.name.as_deref(), Some("base"));
        assert_eq!(info.location, Some(prefix));
        assert_eq!(info.org.as_deref(), Some(ANACONDA_COMPANY));
        assert_eq!(info.sources, vec![EnvSource::Conda]);
        assert!(info.version.is_unknown());
    }

    #[test]
    fn named_env_uses_directory_name() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("miniconda");
        let prefix = root.join("envs").join("ml");
        let exe = conda_env(&prefix, &["python-3.8.5-h5fd99cc_1.json"]);
        let runner = MockRunner::new().with_response(
            "conda info --json",
            ProcessOutput::success(info_json(&root, &[&root, &prefix], &prefix.to_string_lossy())),
        );

        let info = resolve(&exe, &services(runner)).unwrap();

        assert_eq!(info.name.as_deref(), Some("ml"));
        assert_eq!(info.version.to_string(), "3.8.5");
        assert_eq!(info.version.sys_version.as_deref(), Some("3.9.0"));
    }

    #[test]
    fn tool_failure_leaves_marker_only_description() {
        let temp = TempDir::new().unwrap();
        let prefix = temp.path().join("conda1");
        fs::create_dir_all(prefix.join(CONDA_META)).unwrap();
        let exe = prefix.join("python.exe");
        fs::write(&exe, "").unwrap();

        let info = resolve(&exe, &services(MockRunner::new())).unwrap();

        assert_eq!(info.kind, EnvKind::Conda);
        assert_eq!(info.name.as_deref(), Some("conda1"));
        assert_eq!(info.location, Some(prefix));
        assert!(info.org.is_none());
        assert!(info.sources.is_empty());
    }

    #[test]
    fn tool_timeout_is_a_decline_of_enrichment() {
        let temp = TempDir::new().unwrap();
        let prefix = temp.path().join("slow");
        let exe = conda_env(&prefix, &[]);
        let runner = MockRunner::new().with_timeout("conda info --json");

        let info = resolve(&exe, &services(runner)).unwrap();
        assert!(info.sources.is_empty());
    }

    #[test]
    fn unlisted_prefix_is_not_enriched() {
        let temp = TempDir::new().unwrap();
        let prefix = temp.path().join("stray");
        let exe = conda_env(&prefix, &[]);
        let other = temp.path().join("other");
        let runner = MockRunner::new().with_response(
            "conda info --json",
            ProcessOutput::success(info_json(&other, &[&other], "/x")),
        );

        let info = resolve(&exe, &services(runner)).unwrap();
        assert_eq!(info.name.as_deref(), Some("stray"));
        assert!(info.org.is_none());
    }

    #[test]
    fn declines_without_conda_meta() {
        let temp = TempDir::new().unwrap();
        let exe = temp.path().join("bin").join("python");
        assert!(resolve(&exe, &services(MockRunner::new())).is_none());
    }

    #[test]
    fn conda_exe_env_var_selects_command() {
        let temp = TempDir::new().unwrap();
        let prefix = temp.path().join("env");
        let exe = conda_env(&prefix, &[]);
        let runner = MockRunner::new().with_response(
            "/opt/conda/bin/conda info --json",
            ProcessOutput::success(info_json(&prefix, &[], "/x")),
        );
        let services = Services::host()
            .with_env_vars([("CONDA_EXE", "/opt/conda/bin/conda")])
            .with_conda_command("mamba")
            .with_process(runner);

        let info = resolve(&exe, &services).unwrap();
        assert_eq!(info.name.as_deref(), Some("base"));
    }

    #[test]
    fn configured_command_used_without_env_var() {
        let services = services(MockRunner::new()).with_conda_command("mamba");
        assert_eq!(conda_command(&services), "mamba");
    }

    #[test]
    fn meta_version_ignores_other_packages() {
        let temp = TempDir::new().unwrap();
        let prefix = temp.path().join("env");
        conda_env(
            &prefix,
            &["python-dateutil-2.8.1-py_0.json", "python-3.7.9-h60c2a47_0.json"],
        );
        let version = conda_meta_version(&prefix, &services(MockRunner::new()));
        assert_eq!(version, PythonVersion::new(3, Some(7), Some(9)));
    }

    #[test]
    fn parses_conda_info() {
        let json = r#"{"conda_version": "4.8.0", "sys.version": "3.9.0", "root_prefix": "/opt/conda", "envs": ["/opt/conda"]}"#;
        let info: CondaInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.sys_version.as_deref(), Some("3.9.0"));
        assert!(info.is_root(Path::new("/opt/conda/")));
        assert!(info.sys_prefix.is_none());
    }
}
