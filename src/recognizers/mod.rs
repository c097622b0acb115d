//! Channel recognizers.
//!
//! Each [`Channel`] knows how to recognize interpreters installed through
//! it and build an initial description. Channels are probed in
//! [`Channel::PRECEDENCE`] order and the first match wins:
//!
//! 1. [`Channel::Pyenv`] - version manager installs
//! 2. [`Channel::Conda`] - conda environments
//! 3. [`Channel::WindowsStore`] - Microsoft Store packages
//! 4. [`Channel::Venv`] - virtual environments
//!
//! A pyenv-managed Anaconda install therefore resolves as pyenv even
//! though it also carries conda markers.
//!
//! Recognizers never fail: any I/O problem while probing means "decline".

pub mod conda;
pub mod pyenv;
pub mod venv;
pub mod windows_store;

use std::fmt;
use std::path::{Path, PathBuf};

use crate::info::{EnvKind, PythonEnvInfo};
use crate::paths;
use crate::services::Services;

/// A discovery channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Pyenv,
    Conda,
    WindowsStore,
    Venv,
}

impl Channel {
    /// Probe order.
    pub const PRECEDENCE: [Channel; 4] = [
        Channel::Pyenv,
        Channel::Conda,
        Channel::WindowsStore,
        Channel::Venv,
    ];

    /// Describe `executable` if it belongs to this channel.
    pub fn try_resolve(self, executable: &Path, services: &Services) -> Option<PythonEnvInfo> {
        match self {
            Channel::Pyenv => pyenv::resolve(executable, services),
            Channel::Conda => conda::resolve(executable, services),
            Channel::WindowsStore => windows_store::resolve(executable, services),
            Channel::Venv => venv::resolve(executable, services),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Channel::Pyenv => "pyenv",
            Channel::Conda => "conda",
            Channel::WindowsStore => "windows-store",
            Channel::Venv => "venv",
        };
        write!(f, "{}", name)
    }
}

/// Describe `executable` using the first channel that recognizes it.
///
/// Falls back to [`unknown_env`] when every channel declines.
pub fn identify(executable: &Path, services: &Services) -> PythonEnvInfo {
    for channel in Channel::PRECEDENCE {
        if let Some(info) = channel.try_resolve(executable, services) {
            tracing::debug!("{} recognized {}", channel, executable.display());
            return info;
        }
        tracing::trace!("{} declined {}", channel, executable.display());
    }

    tracing::debug!("No channel recognized {}", executable.display());
    unknown_env(executable)
}

/// Description of an interpreter no channel recognized.
pub fn unknown_env(executable: &Path) -> PythonEnvInfo {
    let mut info = PythonEnvInfo::new(EnvKind::Unknown, executable);
    if let Some(dir) = paths::parent_dir(executable) {
        info.name = paths::file_name(&dir);
        info.location = Some(dir);
    }
    info
}

/// Environment directory of an interpreter: its directory, or the parent
/// of that directory when it is `bin` or `Scripts`.
pub(crate) fn env_dir(executable: &Path) -> Option<PathBuf> {
    let dir = paths::parent_dir(executable)?;
    let is_bin = paths::file_name(&dir).is_some_and(|name| {
        name.eq_ignore_ascii_case("bin") || name.eq_ignore_ascii_case("scripts")
    });
    if is_bin {
        paths::parent_dir(&dir)
    } else {
        Some(dir)
    }
}
