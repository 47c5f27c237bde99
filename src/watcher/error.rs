//! Watcher error types.

use std::path::PathBuf;

/// Errors that can occur during folder watching.
#[derive(thiserror::Error, Debug)]
pub enum WatcherError {
    /// A folder to watch does not exist or is not a directory.
    #[error("Source folder does not exist: {0}")]
    SourceMissing(PathBuf),

    /// Notify watcher error.
    #[error("File watcher error: {0}")]
    Notify(#[from] notify::Error),
}
