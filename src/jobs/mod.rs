//! Job definitions and execution.

mod error;
mod job;
mod runner;

pub use error::JobError;
pub use job::Job;
pub use runner::{run_all, run_job, JobOutcome, JobRunner, JobSummary, LinkRunner};
