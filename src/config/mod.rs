//! Configuration loading, merging and validation.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Deep merging in [`merger`]
//!
//! # Example
//!
//! ```
//! use pylocate::config::load_config;
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::write(temp.path().join(".pylocate.yml"), "probe_timeout_secs: 5").unwrap();
//!
//! let config = load_config(temp.path(), None).unwrap();
//! assert_eq!(config.probe_timeout_secs, 5);
//! ```
//!
//! # Configuration File Locations
//!
//! Configuration is merged in this order (later wins):
//! 1. User global config (`<config dir>/pylocate/config.yml`)
//! 2. Project config (`.pylocate.yml`)
//! 3. Explicit `--config` file

pub mod loader;
pub mod merger;
pub mod schema;

pub use loader::{
    load_config, load_config_value, load_from_paths, parse_config, ConfigPaths, PROJECT_CONFIG,
};
pub use merger::{deep_merge, merge_layers};
pub use schema::LocatorConfig;
