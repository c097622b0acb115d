//! pylocate - Identify Python interpreters and describe their environments.
//!
//! Given the path of a Python executable, pylocate works out which
//! installation channel produced it (pyenv, conda, the Microsoft Store, a
//! virtual environment) and reconciles that with what the Windows
//! registry says about the same interpreter.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading, merging and validation
//! - [`error`] - Error types and result aliases
//! - [`info`] - Canonical interpreter descriptions and version parsing
//! - [`paths`] - Separator- and case-insensitive path helpers
//! - [`recognizers`] - Per-channel interpreter recognition
//! - [`registry`] - Windows registry interpreter discovery
//! - [`resolver`] - Resolution orchestration and merging
//! - [`services`] - Injectable access to the filesystem, processes and registry
//! - [`ui`] - Terminal output
//!
//! # Example
//!
//! ```
//! use pylocate::info::EnvKind;
//! use pylocate::resolver::Resolver;
//! use pylocate::services::Services;
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let env = temp.path().join("venv");
//! fs::create_dir_all(env.join("bin")).unwrap();
//! fs::write(env.join("pyvenv.cfg"), "version = 3.12.1\n").unwrap();
//!
//! let resolver = Resolver::new(Services::host());
//! let info = resolver.resolve_env(env.join("bin").join("python")).unwrap();
//! assert_eq!(info.kind, EnvKind::Venv);
//! assert_eq!(info.version.to_string(), "3.12.1");
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod info;
pub mod paths;
pub mod recognizers;
pub mod registry;
pub mod resolver;
pub mod services;
pub mod ui;

pub use error::{LocateError, Result};
