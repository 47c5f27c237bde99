//! Job error types.

use std::io;
use std::path::PathBuf;

use crate::links::LinkError;

/// Failures that abort a single job run.
///
/// Per-file problems never surface here; they are logged and counted in the
/// run summary instead.
#[derive(thiserror::Error, Debug)]
pub enum JobError {
    /// The destination root could not be created.
    #[error("Destination directory unavailable {path}: {source}")]
    DestinationUnavailable { path: PathBuf, source: io::Error },

    /// The source root does not exist or is not a directory.
    #[error("Source directory missing: {0}")]
    SourceMissing(PathBuf),

    /// A library directory could not be created for lack of permissions.
    #[error("Link error: {0}")]
    Link(#[from] LinkError),
}
