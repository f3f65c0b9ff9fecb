//! Workspace folders and the source that supplies them.
//!
//! Detection never discovers workspace roots on its own. A host (the CLI, an
//! editor integration, a test) hands over the folders through a
//! [`WorkspaceSource`], and `None` means no workspace is open at all.

use std::path::{Path, PathBuf};

/// A root folder of the open workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceFolder {
    /// Display name, by default the last component of the root path
    pub name: String,
    /// Position of the folder in the workspace
    pub index: usize,
    /// Root path of the folder
    pub root: PathBuf,
}

impl WorkspaceFolder {
    /// Create a folder named after the last component of its root path.
    pub fn new(index: usize, root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| root.display().to_string());

        Self {
            name,
            index,
            root,
        }
    }

    /// Override the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Build folders from paths, assigning indices in iteration order.
    pub fn from_paths<I, P>(paths: I) -> Vec<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        paths.into_iter().enumerate().map(|(index, root)| Self::new(index, root)).collect()
    }

    /// Root path of the folder.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Supplies the folders of the open workspace.
pub trait WorkspaceSource {
    /// The workspace folders in order, or `None` when no workspace is open.
    fn workspace_folders(&self) -> Option<Vec<WorkspaceFolder>>;
}

/// A [`WorkspaceSource`] over a fixed list of folders.
#[derive(Debug, Clone, Default)]
pub struct StaticWorkspace {
    folders: Option<Vec<WorkspaceFolder>>,
}

impl StaticWorkspace {
    /// A workspace with no folders open.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// A workspace over the given folders.
    #[must_use]
    pub fn new(folders: Vec<WorkspaceFolder>) -> Self {
        Self {
            folders: Some(folders),
        }
    }

    /// A workspace whose folders are the given paths.
    ///
    /// Relative paths are resolved against `base` so records always carry
    /// absolute template paths.
    pub fn from_paths<I, P>(base: &Path, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let roots = paths.into_iter().map(|p| {
            let p = p.as_ref();
            if p.is_absolute() { p.to_path_buf() } else { base.join(p) }
        });
        Self::new(WorkspaceFolder::from_paths(roots))
    }
}

impl WorkspaceSource for StaticWorkspace {
    fn workspace_folders(&self) -> Option<Vec<WorkspaceFolder>> {
        self.folders.clone()
    }
}
