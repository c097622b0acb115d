//! Error types for pylocate operations.
//!
//! This module defines [`LocateError`], the error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! Most variants never reach the caller of
//! [`Resolver::resolve_env`](crate::resolver::Resolver::resolve_env):
//!
//! - `VersionParse` is recovered by substituting the unknown version
//! - `RegistryRead` skips one registry branch
//! - `FileIdentity` leaves the file identity fields empty
//! - `ProcessFailed` / `ProcessTimeout` make a recognizer decline
//!
//! Only `InvalidPath` (an empty input path) is surfaced by resolution.
//! Configuration and I/O variants are reported by the CLI.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for pylocate operations.
#[derive(Debug, Error)]
pub enum LocateError {
    /// The interpreter path is structurally invalid (e.g. empty).
    #[error("Invalid interpreter path: {reason}")]
    InvalidPath { reason: String },

    /// Text did not contain a recognizable version token.
    #[error("No version found in '{input}'")]
    VersionParse { input: String },

    /// A registry key could not be read.
    #[error("Failed to read registry key '{key}': {message}")]
    RegistryRead { key: String, message: String },

    /// File identity (timestamps) could not be read.
    #[error("Cannot stat '{path}': {message}")]
    FileIdentity { path: PathBuf, message: String },

    /// An external process could not be started or exited unsuccessfully.
    #[error("Command failed with exit code {code:?}: {command}")]
    ProcessFailed { command: String, code: Option<i32> },

    /// An external process exceeded its timeout and was killed.
    #[error("Command timed out after {timeout_secs}s: {command}")]
    ProcessTimeout { command: String, timeout_secs: u64 },

    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for pylocate operations.
pub type Result<T> = std::result::Result<T, LocateError>;
