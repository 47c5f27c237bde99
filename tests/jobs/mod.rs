//! Job runner tests against a real filesystem.

#[cfg(unix)]
mod runner_test;

/// Verify all public job types are exported from the library.
#[test]
fn test_all_job_types_exported() {
    use linkarr::config::MediaType;
    use linkarr::jobs::{run_all, Job, JobError, JobRunner, JobSummary, LinkRunner};
    use linkarr::media::PathMatcher;

    let job = Job::new("/src", "/dest", MediaType::Movie, PathMatcher::default())
        .with_enabled(false);
    let outcomes = run_all(&LinkRunner, [&job]);
    assert!(outcomes.is_empty());

    let _: fn() -> JobError = || JobError::SourceMissing("/src".into());
    let _ = JobSummary::default();
    let _: &dyn JobRunner = &LinkRunner;
}
