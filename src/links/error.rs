//! Link error types.

use std::io;
use std::path::PathBuf;

/// Errors that can occur while creating library links.
#[derive(thiserror::Error, Debug)]
pub enum LinkError {
    /// A destination directory could not be created.
    #[error("Failed to create directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },

    /// The source path has no file name to link under.
    #[error("Source has no file name: {0}")]
    NoFileName(PathBuf),

    /// The source or destination path could not be made absolute.
    #[error("Failed to resolve path {path}: {source}")]
    Resolve { path: PathBuf, source: io::Error },

    /// No relative path exists between the link directory and its target.
    #[error("No relative path from {from} to {to}")]
    NoRelativePath { from: PathBuf, to: PathBuf },

    /// The symlink itself could not be created.
    #[error("Failed to create symlink {link}: {source}")]
    Symlink { link: PathBuf, source: io::Error },
}

impl LinkError {
    /// Whether the failure was a permission problem creating a directory.
    #[must_use]
    pub fn is_permission_denied(&self) -> bool {
        matches!(
            self,
            Self::CreateDir { source, .. } if source.kind() == io::ErrorKind::PermissionDenied
        )
    }
}
