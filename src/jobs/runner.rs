//! Job execution: sweep stale links, then link every eligible source file.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::links::{self, LinkError};
use crate::media::{MediaParser, PathMatcher};

use super::error::JobError;
use super::job::Job;

/// Counts reported after a job run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobSummary {
    /// Links created.
    pub added: usize,
    /// Broken links removed.
    pub removed: usize,
    /// Eligible files whose names could not be parsed.
    pub skipped: usize,
    /// Eligible files that could not be linked.
    pub failed: usize,
}

impl fmt::Display for JobSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "added {}, removed {}, skipped {}, failed {}",
            self.added, self.removed, self.skipped, self.failed
        )
    }
}

/// Result of one job within a batch run.
#[derive(Debug)]
pub struct JobOutcome {
    /// Source directory identifying the job.
    pub source: PathBuf,
    pub result: Result<JobSummary, JobError>,
}

/// Executes a job against the filesystem.
///
/// The watch loop only talks to this trait, so tests can substitute a
/// recording runner.
pub trait JobRunner: Send + Sync + 'static {
    /// Run `job` to completion.
    ///
    /// # Errors
    ///
    /// Returns `JobError` when the job as a whole cannot proceed.
    fn run(&self, job: &Job) -> Result<JobSummary, JobError>;
}

/// Runner that reconciles symlinks on disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkRunner;

impl JobRunner for LinkRunner {
    fn run(&self, job: &Job) -> Result<JobSummary, JobError> {
        run_job(job)
    }
}

enum FileOutcome {
    Linked(PathBuf),
    AlreadyLinked,
    Unparsed,
}

/// Run a single job.
///
/// Safe to repeat: a second run over an unchanged source tree adds nothing
/// and never removes a valid link.
///
/// # Errors
///
/// Returns `JobError::DestinationUnavailable` if the destination root cannot
/// be created, `JobError::SourceMissing` if the source root is gone, and
/// `JobError::Link` if a library directory is denied by permissions.
pub fn run_job(job: &Job) -> Result<JobSummary, JobError> {
    let _span = tracing::info_span!("job", source = %job.source().display()).entered();

    fs::create_dir_all(job.dest()).map_err(|source| JobError::DestinationUnavailable {
        path: job.dest().to_path_buf(),
        source,
    })?;

    // Sweeping without a source would drop every link in the library.
    if !job.source().is_dir() {
        return Err(JobError::SourceMissing(job.source().to_path_buf()));
    }

    let mut summary = JobSummary {
        removed: links::sweep_broken(job.dest()),
        ..JobSummary::default()
    };

    for file in find_media_files(job.source(), job.dest(), job.matcher()) {
        match link_file(job, &file) {
            Ok(FileOutcome::Linked(link)) => {
                tracing::debug!(file = %file.display(), link = %link.display(), "Linked file");
                summary.added += 1;
            }
            Ok(FileOutcome::AlreadyLinked) => {}
            Ok(FileOutcome::Unparsed) => {
                tracing::warn!(
                    file = %file.display(),
                    media_type = %job.media_type(),
                    "Skipping file: parse failed"
                );
                summary.skipped += 1;
            }
            Err(e) if e.is_permission_denied() => return Err(e.into()),
            Err(e) => {
                tracing::warn!(file = %file.display(), error = %e, "Failed to link file");
                summary.failed += 1;
            }
        }
    }

    tracing::info!(
        added = summary.added,
        removed = summary.removed,
        skipped = summary.skipped,
        failed = summary.failed,
        "Added {} new symlink(s), removed {} broken symlink(s)",
        summary.added,
        summary.removed
    );
    Ok(summary)
}

/// Run every enabled job in order.
///
/// A failing job is logged and does not stop the jobs after it.
pub fn run_all<'a>(
    runner: &impl JobRunner,
    jobs: impl IntoIterator<Item = &'a Job>,
) -> Vec<JobOutcome> {
    jobs.into_iter()
        .filter(|job| {
            if !job.is_enabled() {
                tracing::debug!(source = %job.source().display(), "Skipping disabled job");
            }
            job.is_enabled()
        })
        .map(|job| {
            let result = runner.run(job);
            if let Err(e) = &result {
                tracing::error!(source = %job.source().display(), error = %e, "Job failed");
            }
            JobOutcome {
                source: job.source().to_path_buf(),
                result,
            }
        })
        .collect()
}

fn link_file(job: &Job, file: &Path) -> Result<FileOutcome, LinkError> {
    let Some(dest_dir) = job.parser().destination(file, job.dest()) else {
        return Ok(FileOutcome::Unparsed);
    };
    Ok(match links::create_link(file, &dest_dir)? {
        Some(link) => FileOutcome::Linked(link),
        None => FileOutcome::AlreadyLinked,
    })
}

/// Eligible files under `source`, in walk order.
///
/// Symlinks to regular files count as files. A destination nested inside
/// the source is not descended into.
fn find_media_files(source: &Path, dest: &Path, matcher: &PathMatcher) -> Vec<PathBuf> {
    WalkDir::new(source)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || entry.path() != dest)
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping unreadable source entry");
                None
            }
        })
        .filter(|entry| {
            let file_type = entry.file_type();
            file_type.is_file() || (file_type.is_symlink() && entry.path().is_file())
        })
        .filter(|entry| matcher.is_eligible(&entry.file_name().to_string_lossy()))
        .map(walkdir::DirEntry::into_path)
        .collect()
}
