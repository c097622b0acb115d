//! Filesystem access for recognizers.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::error::{LocateError, Result};
use crate::info::FileInfo;

/// Read-only filesystem operations used during resolution.
pub trait FileSystem: Send + Sync {
    /// Creation and modification times of a file.
    ///
    /// Fails with [`LocateError::FileIdentity`] when the path does not exist.
    fn stat_file(&self, path: &Path) -> Result<FileInfo>;

    /// Whether `path` is an existing directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Whether `path` is an existing file.
    fn is_file(&self, path: &Path) -> bool;

    /// Names of the entries in a directory.
    fn list_dir(&self, path: &Path) -> Result<Vec<String>>;

    /// Read a text file.
    fn read_to_string(&self, path: &Path) -> Result<String>;
}

/// [`FileSystem`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostFileSystem;

impl FileSystem for HostFileSystem {
    fn stat_file(&self, path: &Path) -> Result<FileInfo> {
        let meta = fs::metadata(path).map_err(|e| LocateError::FileIdentity {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Ok(FileInfo {
            ctime: meta.created().ok().map(DateTime::<Utc>::from),
            mtime: meta.modified().ok().map(DateTime::<Utc>::from),
        })
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(path)? {
            names.push(entry?.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        Ok(fs::read_to_string(path)?)
    }
}
