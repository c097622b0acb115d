//! Integration tests for the pylocate binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SNAPSHOT: &str = r#"
- hive: HKLM
  view: x64
  key: \SOFTWARE\Python
  subkeys: [\SOFTWARE\Python\PythonCore]
- hive: HKLM
  view: x64
  key: \SOFTWARE\Python\PythonCore
  subkeys: [\SOFTWARE\Python\PythonCore\3.9]
- hive: HKLM
  view: x64
  key: \SOFTWARE\Python\PythonCore\3.9
  values:
    DisplayName: Python 3.9 (64-bit)
    SysArchitecture: 64bit
    SysVersion: "3.9"
    Version: 3.9.0rc2
  subkeys: [\SOFTWARE\Python\PythonCore\3.9\InstallPath]
- hive: HKLM
  view: x64
  key: \SOFTWARE\Python\PythonCore\3.9\InstallPath
  values:
    ExecutablePath: C:\py39\python.exe
"#;

fn pylocate(project: &Path) -> Command {
    let mut cmd = Command::new(cargo_bin("pylocate"));
    cmd.current_dir(project)
        .env_remove("CONDA_EXE")
        .env_remove("PYENV_ROOT")
        .env_remove("RUST_LOG");
    cmd
}

fn make_venv(root: &Path) -> PathBuf {
    let env = root.join("env");
    fs::create_dir_all(env.join("bin")).unwrap();
    fs::write(env.join("pyvenv.cfg"), "home = /usr/bin\nversion = 3.10.12\n").unwrap();
    let exe = env.join("bin").join("python");
    fs::write(&exe, "").unwrap();
    exe
}

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("pylocate"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Identify Python interpreters"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("pylocate"));
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn cli_requires_subcommand() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("pylocate"));
    cmd.assert().failure().code(2);
    Ok(())
}

#[test]
fn resolve_venv_as_json() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let exe = make_venv(temp.path());

    let output = pylocate(temp.path())
        .args(["resolve", "--json"])
        .arg(&exe)
        .output()?;

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(value[0]["kind"], "venv");
    assert_eq!(value[0]["name"], "env");
    assert_eq!(value[0]["version"]["major"], 3);
    assert_eq!(value[0]["version"]["minor"], 10);
    Ok(())
}

#[test]
fn resolve_human_readable() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let exe = make_venv(temp.path());

    pylocate(temp.path())
        .args(["resolve", "--no-color"])
        .arg(&exe)
        .assert()
        .success()
        .stdout(predicate::str::contains("kind:"))
        .stdout(predicate::str::contains("venv"))
        .stdout(predicate::str::contains("3.10.12"));
    Ok(())
}

#[test]
fn resolve_blank_path_fails() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;

    pylocate(temp.path())
        .args(["resolve", "   "])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("path is empty"));
    Ok(())
}

#[test]
fn registry_lists_snapshot() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    fs::write(temp.path().join("snapshot.yml"), SNAPSHOT)?;
    let config = temp.path().join("ci.yml");
    fs::write(&config, "registry_snapshot: snapshot.yml\n")?;

    let output = pylocate(temp.path())
        .args(["registry", "--json", "--config"])
        .arg(&config)
        .output()?;

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(value.as_array().map(Vec::len), Some(1));
    assert_eq!(value[0]["kind"], "other_global");
    assert_eq!(value[0]["org"], "PythonCore");
    assert_eq!(value[0]["display_name"], "Python 3.9 (64-bit)");
    Ok(())
}

#[test]
fn registry_merges_into_resolve() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    fs::write(temp.path().join("snapshot.yml"), SNAPSHOT)?;
    fs::write(
        temp.path().join(".pylocate.yml"),
        "registry_snapshot: snapshot.yml\n",
    )?;

    pylocate(temp.path())
        .args(["resolve", "--json", r"c:\PY39\python.exe"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"other_global\""))
        .stdout(predicate::str::contains("PythonCore"));
    Ok(())
}

#[test]
fn config_schema_is_json() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;

    let output = pylocate(temp.path()).args(["config", "--schema"]).output()?;

    assert!(output.status.success());
    let schema: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert!(schema["properties"]["probe_timeout_secs"].is_object());
    Ok(())
}

#[test]
fn config_reports_invalid_values() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    fs::write(temp.path().join(".pylocate.yml"), "probe_timeout_secs: 0\n")?;

    pylocate(temp.path())
        .arg("config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("probe_timeout_secs"));
    Ok(())
}

#[test]
fn explicit_config_must_exist() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;

    pylocate(temp.path())
        .args(["config", "--config", "missing.yml"])
        .assert()
        .failure()
        .code(1);
    Ok(())
}

#[test]
fn project_flag_selects_config() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let project = temp.path().join("proj");
    fs::create_dir_all(&project)?;
    fs::write(project.join(".pylocate.yml"), "probe_timeout_secs: 42\n")?;

    pylocate(temp.path())
        .args(["config", "--json", "--project"])
        .arg(&project)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"probe_timeout_secs\": 42"));
    Ok(())
}

#[test]
fn completions_for_bash() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("pylocate"));
    cmd.args(["completions", "bash"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("pylocate"));
    Ok(())
}

#[test]
fn debug_logs_go_to_stderr() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let exe = make_venv(temp.path());

    let output = pylocate(temp.path())
        .args(["resolve", "--json", "--debug"])
        .arg(&exe)
        .output()?;

    assert!(output.status.success());
    serde_json::from_slice::<serde_json::Value>(&output.stdout)?;
    assert!(String::from_utf8_lossy(&output.stderr).contains("Resolving"));
    Ok(())
}
