//! `venv` and `virtualenv` environments.

use std::path::{Path, PathBuf};

use crate::info::{parse_version_or_unknown, EnvKind, PythonEnvInfo, PythonVersion};
use crate::paths;
use crate::services::Services;

use super::env_dir;

const PYVENV_CFG: &str = "pyvenv.cfg";

const ACTIVATE_SCRIPTS: &[&str] = &["activate", "activate.bat", "activate.ps1"];

/// Version recorded in `pyvenv.cfg`.
///
/// `venv` writes `version = 3.8.5`; `virtualenv` writes
/// `version_info = 3.8.5.final.0`, which is also kept as the
/// `sys_version` tag.
pub fn parse_pyvenv_cfg(content: &str) -> PythonVersion {
    let mut version = None;
    let mut version_info = None;

    for line in content.lines() {
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        match key.trim().to_lowercase().as_str() {
            "version" => version = Some(value.trim().to_string()),
            "version_info" => version_info = Some(value.trim().to_string()),
            _ => {}
        }
    }

    let mut parsed = version
        .as_deref()
        .or(version_info.as_deref())
        .map(parse_version_or_unknown)
        .unwrap_or_else(PythonVersion::unknown);
    if !parsed.is_unknown() {
        parsed.sys_version = version_info;
    }
    parsed
}

/// Describe `executable` if it belongs to a virtual environment.
pub fn resolve(executable: &Path, services: &Services) -> Option<PythonEnvInfo> {
    let exe_dir = paths::parent_dir(executable)?;
    let env = env_dir(executable)?;

    let cfg = [paths::join(&env, PYVENV_CFG), paths::join(&exe_dir, PYVENV_CFG)]
        .into_iter()
        .find(|p| services.fs.is_file(p));

    let (kind, version) = match cfg {
        Some(cfg) => match services.fs.read_to_string(&cfg) {
            Ok(content) => (EnvKind::Venv, parse_pyvenv_cfg(&content)),
            Err(e) => {
                tracing::debug!("Cannot read {}: {}", cfg.display(), e);
                return None;
            }
        },
        None if has_activate_script(&exe_dir, services) => {
            (EnvKind::VirtualEnv, PythonVersion::unknown())
        }
        None => return None,
    };

    let mut info = PythonEnvInfo::new(kind, executable).with_version(version);
    info.name = paths::file_name(&env);
    info.search_location = search_location(&env, services);
    info.location = Some(env);
    Some(info)
}

fn has_activate_script(dir: &Path, services: &Services) -> bool {
    ACTIVATE_SCRIPTS
        .iter()
        .any(|script| services.fs.is_file(&paths::join(dir, script)))
}

/// Parent of `env` when the environment sits inside a workspace folder.
fn search_location(env: &Path, services: &Services) -> Option<PathBuf> {
    services
        .workspace
        .list_workspace_folders()
        .iter()
        .any(|folder| paths::is_within(env, folder))
        .then(|| paths::parent_dir(env))
        .flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::StaticWorkspace;
    use std::fs;
    use tempfile::TempDir;

    fn make_env(dir: &Path, bin: Option<&str>, files: &[(&str, &str)]) -> PathBuf {
        let exe_dir = match bin {
            Some(bin) => dir.join(bin),
            None => dir.to_path_buf(),
        };
        fs::create_dir_all(&exe_dir).unwrap();
        for (name, content) in files {
            let target = if *name == PYVENV_CFG { dir.join(name) } else { exe_dir.join(name) };
            fs::write(target, content).unwrap();
        }
        let exe = exe_dir.join("python");
        fs::write(&exe, "").unwrap();
        exe
    }

    #[test]
    fn venv_with_cfg() {
        let temp = TempDir::new().unwrap();
        let env = temp.path().join(".venv");
        let exe = make_env(&env, Some("bin"), &[(PYVENV_CFG, "home = /usr/bin\nversion = 3.8.5\n")]);

        let info = resolve(&exe, &Services::host()).unwrap();

        assert_eq!(info.kind, EnvKind::Venv);
        assert_eq!(info.name.as_deref(), Some(".venv"));
        assert_eq!(info.location, Some(env));
        assert_eq!(info.version, PythonVersion::new(3, Some(8), Some(5)));
        assert!(info.search_location.is_none());
        assert!(info.sources.is_empty());
    }

    #[test]
    fn flat_layout_venv() {
        let temp = TempDir::new().unwrap();
        let env = temp.path().join("win1");
        let exe = make_env(&env, None, &[(PYVENV_CFG, "home = C:\\Python38")]);

        let info = resolve(&exe, &Services::host()).unwrap();
        assert_eq!(info.kind, EnvKind::Venv);
        assert_eq!(info.name.as_deref(), Some("win1"));
        assert!(info.version.is_unknown());
    }

    #[test]
    fn activate_script_means_virtualenv() {
        let temp = TempDir::new().unwrap();
        let env = temp.path().join("legacy");
        let exe = make_env(&env, Some("bin"), &[("activate", "")]);

        let info = resolve(&exe, &Services::host()).unwrap();
        assert_eq!(info.kind, EnvKind::VirtualEnv);
        assert_eq!(info.name.as_deref(), Some("legacy"));
    }

    #[test]
    fn plain_directory_declines() {
        let temp = TempDir::new().unwrap();
        let exe = make_env(&temp.path().join("usr"), Some("bin"), &[]);
        assert!(resolve(&exe, &Services::host()).is_none());
    }

    #[test]
    fn workspace_env_gets_search_location() {
        let temp = TempDir::new().unwrap();
        let home = temp.path().join("virtualhome");
        let env = home.join(".venvs").join("win1");
        let exe = make_env(&env, None, &[(PYVENV_CFG, "version = 3.9.1")]);
        let services = Services::host().with_workspace(StaticWorkspace::new(vec![home.clone()]));

        let info = resolve(&exe, &services).unwrap();
        assert_eq!(info.search_location, Some(home.join(".venvs")));
    }

    #[test]
    fn pyvenv_cfg_version_info() {
        let v = parse_pyvenv_cfg("home = /usr\nversion_info = 3.8.5.final.0\n");
        assert_eq!(v.major, Some(3));
        assert_eq!(v.micro, Some(5));
        assert_eq!(v.sys_version.as_deref(), Some("3.8.5.final.0"));
    }

    #[test]
    fn pyvenv_cfg_prefers_version_key() {
        let v = parse_pyvenv_cfg("version = 3.9.1\nversion_info = 3.9.1.final.0\n");
        assert_eq!(v.to_string(), "3.9.1");
        assert_eq!(v.sys_version.as_deref(), Some("3.9.1.final.0"));
    }

    #[test]
    fn pyvenv_cfg_without_version() {
        assert!(parse_pyvenv_cfg("home = /usr/bin").is_unknown());
    }
}
