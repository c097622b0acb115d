//! Access to the Windows configuration registry.
//!
//! The registry tree reader only needs two read operations, listing
//! subkeys and listing values. Three implementations exist:
//!
//! - [`NoRegistry`] for hosts without a registry
//! - [`RegExeRegistry`] which queries `reg.exe` through a [`ProcessRunner`]
//! - [`InMemoryRegistry`] for snapshots and tests
//!
//! All of them return an empty list for a key that does not exist.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{LocateError, Result};
use crate::paths;
use crate::services::process::ProcessRunner;

/// Registry root (scope).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RegistryHive {
    /// Machine-wide installs.
    #[serde(rename = "HKLM")]
    LocalMachine,
    /// Per-user installs.
    #[serde(rename = "HKCU")]
    CurrentUser,
}

impl RegistryHive {
    /// Walk order: machine-wide first.
    pub const ALL: [RegistryHive; 2] = [RegistryHive::LocalMachine, RegistryHive::CurrentUser];

    /// Abbreviation accepted by `reg.exe`.
    pub fn short_name(self) -> &'static str {
        match self {
            RegistryHive::LocalMachine => "HKLM",
            RegistryHive::CurrentUser => "HKCU",
        }
    }

    /// Name `reg.exe` prints in its output.
    pub fn long_name(self) -> &'static str {
        match self {
            RegistryHive::LocalMachine => "HKEY_LOCAL_MACHINE",
            RegistryHive::CurrentUser => "HKEY_CURRENT_USER",
        }
    }
}

impl fmt::Display for RegistryHive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

/// 32-bit or 64-bit registry view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistryView {
    X64,
    X86,
}

impl RegistryView {
    /// `reg.exe` switch selecting this view.
    pub fn reg_flag(self) -> &'static str {
        match self {
            RegistryView::X64 => "/reg:64",
            RegistryView::X86 => "/reg:32",
        }
    }
}

impl fmt::Display for RegistryView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryView::X64 => write!(f, "x64"),
            RegistryView::X86 => write!(f, "x86"),
        }
    }
}

/// A named value under a registry key. The default value has an empty name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryValue {
    pub name: String,
    pub value: String,
}

impl RegistryValue {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Read-only registry operations.
pub trait RegistryService: Send + Sync {
    /// Full paths of the immediate subkeys of `key`.
    fn list_subkeys(&self, hive: RegistryHive, view: RegistryView, key: &str)
        -> Result<Vec<String>>;

    /// Values stored directly under `key`.
    fn list_values(
        &self,
        hive: RegistryHive,
        view: RegistryView,
        key: &str,
    ) -> Result<Vec<RegistryValue>>;
}

/// Registry for hosts that have none: every key is absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRegistry;

impl RegistryService for NoRegistry {
    fn list_subkeys(&self, _: RegistryHive, _: RegistryView, _: &str) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    fn list_values(&self, _: RegistryHive, _: RegistryView, _: &str) -> Result<Vec<RegistryValue>> {
        Ok(Vec::new())
    }
}

/// One key in a registry snapshot file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotKey {
    pub hive: RegistryHive,
    pub view: RegistryView,
    pub key: String,
    #[serde(default)]
    pub values: BTreeMap<String, String>,
    #[serde(default)]
    pub subkeys: Vec<String>,
}

#[derive(Debug, Clone, Default)]
struct KeyData {
    values: Vec<RegistryValue>,
    subkeys: Vec<String>,
}

/// A registry tree held in memory.
///
/// # Example
///
/// ```
/// use pylocate::services::registry::{InMemoryRegistry, RegistryHive, RegistryService, RegistryView};
///
/// let registry = InMemoryRegistry::new().with_key(
///     RegistryHive::LocalMachine,
///     RegistryView::X64,
///     r"\SOFTWARE\Python",
///     &[],
///     &[r"\SOFTWARE\Python\PythonCore"],
/// );
/// let companies = registry
///     .list_subkeys(RegistryHive::LocalMachine, RegistryView::X64, r"\SOFTWARE\Python")
///     .unwrap();
/// assert_eq!(companies, vec![r"\SOFTWARE\Python\PythonCore".to_string()]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryRegistry {
    keys: BTreeMap<(RegistryHive, RegistryView, String), KeyData>,
}

impl InMemoryRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key with its values and subkeys.
    pub fn with_key(
        mut self,
        hive: RegistryHive,
        view: RegistryView,
        key: &str,
        values: &[(&str, &str)],
        subkeys: &[&str],
    ) -> Self {
        self.insert_key(
            hive,
            view,
            key,
            values.iter().map(|(n, v)| RegistryValue::new(*n, *v)).collect(),
            subkeys.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    /// Add a key in place.
    pub fn insert_key(
        &mut self,
        hive: RegistryHive,
        view: RegistryView,
        key: &str,
        values: Vec<RegistryValue>,
        subkeys: Vec<String>,
    ) {
        self.keys
            .insert((hive, view, key_id(key)), KeyData { values, subkeys });
    }

    /// Build from snapshot entries.
    pub fn from_snapshot(entries: Vec<SnapshotKey>) -> Self {
        let mut registry = Self::new();
        for entry in entries {
            registry.insert_key(
                entry.hive,
                entry.view,
                &entry.key,
                entry
                    .values
                    .into_iter()
                    .map(|(name, value)| RegistryValue { name, value })
                    .collect(),
                entry.subkeys,
            );
        }
        registry
    }

    /// Load a YAML (or JSON) snapshot file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let entries: Vec<SnapshotKey> =
            serde_yaml::from_str(&content).map_err(|e| LocateError::ConfigParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        Ok(Self::from_snapshot(entries))
    }

    fn get(&self, hive: RegistryHive, view: RegistryView, key: &str) -> Option<&KeyData> {
        self.keys.get(&(hive, view, key_id(key)))
    }
}

impl RegistryService for InMemoryRegistry {
    fn list_subkeys(&self, hive: RegistryHive, view: RegistryView, key: &str) -> Result<Vec<String>> {
        Ok(self
            .get(hive, view, key)
            .map(|k| k.subkeys.clone())
            .unwrap_or_default())
    }

    fn list_values(
        &self,
        hive: RegistryHive,
        view: RegistryView,
        key: &str,
    ) -> Result<Vec<RegistryValue>> {
        Ok(self
            .get(hive, view, key)
            .map(|k| k.values.clone())
            .unwrap_or_default())
    }
}

fn key_id(key: &str) -> String {
    paths::normalize(Path::new(key))
}

static REG_VALUE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ {4}(.+?) {4}(REG_[A-Z0-9_]+)(?: {4}(.*))?$").expect("reg value pattern is valid")
});

/// Registry read through `reg.exe query`.
pub struct RegExeRegistry {
    runner: Arc<dyn ProcessRunner>,
    timeout: Duration,
}

/// Parsed output of one `reg query` call.
#[derive(Debug, Default, PartialEq)]
pub struct RegQueryOutput {
    pub values: Vec<RegistryValue>,
    pub subkeys: Vec<String>,
}

impl RegExeRegistry {
    /// Create a registry reader that shells out through `runner`.
    pub fn new(runner: Arc<dyn ProcessRunner>, timeout: Duration) -> Self {
        Self { runner, timeout }
    }

    fn query(&self, hive: RegistryHive, view: RegistryView, key: &str) -> Result<RegQueryOutput> {
        let key = if key.starts_with('\\') {
            key.to_string()
        } else {
            format!("\\{}", key)
        };
        let target = format!("{}{}", hive.short_name(), key);
        let read_err = |message: String| LocateError::RegistryRead {
            key: target.clone(),
            message,
        };

        let output = self
            .runner
            .run("reg", &["query", &target, view.reg_flag()], self.timeout)
            .map_err(|e| read_err(e.to_string()))?;

        if !output.success {
            let text = format!("{}{}", output.stderr, output.stdout).to_lowercase();
            if text.contains("unable to find") {
                return Ok(RegQueryOutput::default());
            }
            return Err(read_err(output.stderr.trim().to_string()));
        }

        Ok(parse_reg_query(&output.stdout, hive, &key))
    }
}

impl RegistryService for RegExeRegistry {
    fn list_subkeys(&self, hive: RegistryHive, view: RegistryView, key: &str) -> Result<Vec<String>> {
        Ok(self.query(hive, view, key)?.subkeys)
    }

    fn list_values(
        &self,
        hive: RegistryHive,
        view: RegistryView,
        key: &str,
    ) -> Result<Vec<RegistryValue>> {
        Ok(self.query(hive, view, key)?.values)
    }
}

/// Parse the text printed by `reg query <hive><key>`.
///
/// Value lines are indented by four spaces; subkeys are printed as full
/// `HKEY_...` paths, which are returned relative to the hive (leading `\`).
pub fn parse_reg_query(stdout: &str, hive: RegistryHive, key: &str) -> RegQueryOutput {
    let queried = format!("{}{}", hive.long_name(), key);
    let mut out = RegQueryOutput::default();

    for line in stdout.lines().map(|l| l.trim_end_matches('\r')) {
        if line.trim().is_empty() {
            continue;
        }
        if let Some(caps) = REG_VALUE_LINE.captures(line) {
            let name = caps.get(1).map_or("", |m| m.as_str());
            let name = if name == "(Default)" { "" } else { name };
            let value = caps.get(3).map_or("", |m| m.as_str());
            out.values.push(RegistryValue::new(name, value));
            continue;
        }
        if line.starts_with("HKEY_") {
            if line.eq_ignore_ascii_case(&queried) {
                continue;
            }
            if let Some(rest) = line.get(hive.long_name().len()..) {
                out.subkeys.push(rest.to_string());
            }
        }
    }

    out
}
