//! Change-driven job dispatch.
//!
//! After one initial pass over every enabled job, each job gets its own
//! worker task. Change notifications are routed to the worker whose job
//! owns the changed source folder through a one-slot trigger queue, so a
//! burst of notifications collapses into at most one pending re-run and a
//! job never runs concurrently with itself. Workers for different jobs run
//! in parallel.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::jobs::{self, Job, JobError, JobRunner, JobSummary, LinkRunner};

use super::folder_watcher::FolderEvent;
use super::state::{DispatchState, DispatchStateMachine, DispatchStats};

/// What caused a job run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// The startup pass over all jobs.
    Initial,
    /// A change notification for the job's source folder.
    Change,
}

/// Outcome of one completed job run.
#[derive(Debug)]
pub struct JobReport {
    /// Source folder identifying the job.
    pub source: PathBuf,
    pub trigger: Trigger,
    pub result: Result<JobSummary, JobError>,
}

/// Counters collected over the lifetime of a watch loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatchStats {
    /// Runs performed by the startup pass.
    pub initial_runs: usize,
    /// Runs performed in response to change notifications.
    pub change_runs: usize,
    /// Runs, of either kind, that returned an error or panicked.
    pub failed_runs: usize,
    /// Notifications absorbed by an already pending run.
    pub coalesced: usize,
    /// Notifications naming a folder no enabled job watches.
    pub unrouted: usize,
    /// Errors reported by the change source.
    pub watcher_errors: usize,
}

impl WatchStats {
    fn absorb(&mut self, worker: DispatchStats) {
        self.change_runs += worker.runs;
        self.failed_runs += worker.failures;
    }
}

/// Re-runs jobs when their source folders change.
pub struct WatchLoop<R: JobRunner = LinkRunner> {
    jobs: Vec<Arc<Job>>,
    runner: Arc<R>,
    reports: Option<mpsc::UnboundedSender<JobReport>>,
}

impl WatchLoop<LinkRunner> {
    /// Create a watch loop that reconciles links on disk.
    #[must_use]
    pub fn new(jobs: impl IntoIterator<Item = Job>) -> Self {
        Self::with_runner(jobs, LinkRunner)
    }
}

impl<R: JobRunner> WatchLoop<R> {
    /// Create a watch loop with a custom job runner.
    #[must_use]
    pub fn with_runner(jobs: impl IntoIterator<Item = Job>, runner: R) -> Self {
        Self {
            jobs: jobs.into_iter().map(Arc::new).collect(),
            runner: Arc::new(runner),
            reports: None,
        }
    }

    /// Send a report after every completed run.
    #[must_use]
    pub fn with_reports(mut self, reports: mpsc::UnboundedSender<JobReport>) -> Self {
        self.reports = Some(reports);
        self
    }

    /// Source folders of the enabled jobs, in config order.
    #[must_use]
    pub fn watched_roots(&self) -> Vec<PathBuf> {
        self.enabled_jobs()
            .map(|(_, job)| job.source().to_path_buf())
            .collect()
    }

    /// The enabled job whose source folder is exactly `root`.
    #[must_use]
    pub fn route(&self, root: &Path) -> Option<&Job> {
        self.route_index(root).map(|index| self.jobs[index].as_ref())
    }

    fn route_index(&self, root: &Path) -> Option<usize> {
        self.enabled_jobs()
            .find(|(_, job)| job.source() == root)
            .map(|(index, _)| index)
    }

    fn enabled_jobs(&self) -> impl Iterator<Item = (usize, &Arc<Job>)> {
        self.jobs.iter().enumerate().filter(|(_, job)| job.is_enabled())
    }

    /// Run the initial pass, then dispatch change events until `cancel`
    /// fires or the event stream ends.
    ///
    /// Shutdown waits for in-flight runs; triggers still pending are dropped.
    pub async fn run(
        self,
        mut events: mpsc::UnboundedReceiver<FolderEvent>,
        cancel: CancellationToken,
    ) -> WatchStats {
        let mut stats = WatchStats::default();

        tracing::info!("Performing initial run");
        self.initial_pass(&mut stats).await;
        if cancel.is_cancelled() {
            return stats;
        }

        let mut workers = JoinSet::new();
        let mut triggers: HashMap<usize, mpsc::Sender<()>> = HashMap::new();
        for (index, job) in self.enabled_jobs() {
            let (trigger_tx, trigger_rx) = mpsc::channel(1);
            triggers.insert(index, trigger_tx);
            workers.spawn(run_worker(
                Arc::clone(job),
                Arc::clone(&self.runner),
                trigger_rx,
                cancel.clone(),
                self.reports.clone(),
            ));
        }
        tracing::info!(jobs = triggers.len(), "Watching for changes");

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    tracing::info!("Shutdown requested");
                    break;
                }
                event = events.recv() => match event {
                    Some(FolderEvent::Changed(root)) => self.dispatch(&root, &triggers, &mut stats),
                    Some(FolderEvent::Error(e)) => {
                        tracing::warn!(error = %e, "Folder watcher error");
                        stats.watcher_errors += 1;
                    }
                    None => {
                        tracing::info!("Change stream closed");
                        break;
                    }
                },
            }
        }

        drop(triggers);
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(worker_stats) => stats.absorb(worker_stats),
                Err(e) => tracing::error!(error = %e, "Job worker panicked"),
            }
        }

        tracing::info!(
            initial_runs = stats.initial_runs,
            change_runs = stats.change_runs,
            failed_runs = stats.failed_runs,
            "Watch loop stopped"
        );
        stats
    }

    async fn initial_pass(&self, stats: &mut WatchStats) {
        let runner = Arc::clone(&self.runner);
        let all_jobs = self.jobs.clone();
        let outcomes = tokio::task::spawn_blocking(move || {
            jobs::run_all(runner.as_ref(), all_jobs.iter().map(|job| &**job))
        })
        .await;

        let outcomes = match outcomes {
            Ok(outcomes) => outcomes,
            Err(e) => {
                tracing::error!(error = %e, "Initial run panicked");
                stats.failed_runs += 1;
                return;
            }
        };

        for outcome in outcomes {
            stats.initial_runs += 1;
            if outcome.result.is_err() {
                stats.failed_runs += 1;
            }
            if let Some(reports) = &self.reports {
                let _ = reports.send(JobReport {
                    source: outcome.source,
                    trigger: Trigger::Initial,
                    result: outcome.result,
                });
            }
        }
    }

    fn dispatch(
        &self,
        root: &Path,
        triggers: &HashMap<usize, mpsc::Sender<()>>,
        stats: &mut WatchStats,
    ) {
        let Some(trigger) = self.route_index(root).and_then(|index| triggers.get(&index)) else {
            tracing::warn!(folder = %root.display(), "No job found for changed folder");
            stats.unrouted += 1;
            return;
        };

        match trigger.try_send(()) {
            Ok(()) => {
                tracing::info!(folder = %root.display(), "Processing job for changed folder");
            }
            Err(TrySendError::Full(())) => {
                tracing::debug!(folder = %root.display(), "Run already pending, coalescing");
                stats.coalesced += 1;
            }
            Err(TrySendError::Closed(())) => {
                tracing::warn!(folder = %root.display(), "Job worker is gone");
            }
        }
    }
}

impl<R: JobRunner> std::fmt::Debug for WatchLoop<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchLoop")
            .field("jobs", &self.jobs.len())
            .field("reports", &self.reports.is_some())
            .finish_non_exhaustive()
    }
}

/// Serve run triggers for a single job until cancelled or disconnected.
async fn run_worker<R: JobRunner>(
    job: Arc<Job>,
    runner: Arc<R>,
    mut triggers: mpsc::Receiver<()>,
    cancel: CancellationToken,
    reports: Option<mpsc::UnboundedSender<JobReport>>,
) -> DispatchStats {
    let mut machine = DispatchStateMachine::new();

    loop {
        let next = tokio::select! {
            biased;
            () = cancel.cancelled() => None,
            trigger = triggers.recv() => trigger,
        };
        if next.is_none() {
            break;
        }

        machine.transition(DispatchState::Dispatching);
        let runner = Arc::clone(&runner);
        let blocking_job = Arc::clone(&job);
        let joined = tokio::task::spawn_blocking(move || runner.run(&blocking_job)).await;

        match joined {
            Ok(result) => {
                if let Err(e) = &result {
                    tracing::error!(source = %job.source().display(), error = %e, "Job failed");
                }
                machine.record_run(result.is_ok());
                if let Some(reports) = &reports {
                    let _ = reports.send(JobReport {
                        source: job.source().to_path_buf(),
                        trigger: Trigger::Change,
                        result,
                    });
                }
            }
            Err(e) => {
                tracing::error!(source = %job.source().display(), error = %e, "Job run panicked");
                machine.record_run(false);
            }
        }
        machine.transition(DispatchState::Idle);
    }

    machine.stats()
}
