//! Workspace folder enumeration.

use std::path::PathBuf;

/// Source of the workspace folders currently open.
pub trait WorkspaceFolders: Send + Sync {
    /// Workspace folders; empty when none are open.
    fn list_workspace_folders(&self) -> Vec<PathBuf>;
}

/// A fixed list of workspace folders (from config or CLI flags).
#[derive(Debug, Clone, Default)]
pub struct StaticWorkspace {
    folders: Vec<PathBuf>,
}

impl StaticWorkspace {
    /// Create a workspace from a list of folders.
    pub fn new(folders: Vec<PathBuf>) -> Self {
        Self { folders }
    }
}

impl WorkspaceFolders for StaticWorkspace {
    fn list_workspace_folders(&self) -> Vec<PathBuf> {
        self.folders.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_workspace_lists_nothing() {
        assert!(StaticWorkspace::default().list_workspace_folders().is_empty());
    }

    #[test]
    fn lists_configured_folders() {
        let ws = StaticWorkspace::new(vec![PathBuf::from("/work/a"), PathBuf::from("/work/b")]);
        assert_eq!(ws.list_workspace_folders().len(), 2);
    }
}
