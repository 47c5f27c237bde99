//! Folder watcher with notify integration.
//!
//! Watches job source folders recursively and reports which registered
//! root saw a change.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify_debouncer_full::{
    new_debouncer,
    notify::{event::ModifyKind, EventKind, RecommendedWatcher, RecursiveMode},
    DebounceEventResult, Debouncer, RecommendedCache,
};
use tokio::sync::mpsc;

use super::error::WatcherError;

/// Quiet period before a burst of filesystem events is delivered.
pub const DEBOUNCE_TIMEOUT: Duration = Duration::from_millis(100);

/// Events emitted by the folder watcher.
#[derive(Debug)]
pub enum FolderEvent {
    /// Something was created, removed or renamed under this watched root.
    Changed(PathBuf),
    /// An error occurred during watching.
    Error(WatcherError),
}

/// Maps event paths back to the root they were registered under.
#[derive(Debug, Clone)]
struct RootResolver {
    roots: Vec<(PathBuf, Option<PathBuf>)>,
}

impl RootResolver {
    fn new(roots: &[PathBuf]) -> Self {
        Self {
            roots: roots
                .iter()
                .map(|root| (root.clone(), root.canonicalize().ok()))
                .collect(),
        }
    }

    /// Every registered root containing `path`.
    ///
    /// Nested roots all match, since each job walks its whole tree.
    fn roots_for<'a>(&'a self, path: &'a Path) -> impl Iterator<Item = &'a PathBuf> + 'a {
        self.roots
            .iter()
            .filter(move |(root, canonical)| {
                path.starts_with(root) || canonical.as_ref().is_some_and(|c| path.starts_with(c))
            })
            .map(|(root, _)| root)
    }
}

/// Watches source folders for changes.
///
/// Uses notify-debouncer-full for filesystem events and hands them to a
/// tokio channel; nothing is processed on the notify thread beyond mapping
/// paths to roots.
pub struct FolderWatcher {
    roots: Vec<PathBuf>,
    debouncer: Option<Debouncer<RecommendedWatcher, RecommendedCache>>,
}

impl FolderWatcher {
    /// Start watching `roots` recursively.
    ///
    /// Returns the watcher and a receiver for folder events. Each debounced
    /// batch yields at most one `Changed` per affected root.
    ///
    /// # Errors
    ///
    /// Returns `WatcherError::SourceMissing` if a root is not a directory,
    /// or `WatcherError::Notify` if the watcher cannot be set up.
    pub fn new(
        roots: Vec<PathBuf>,
    ) -> Result<(Self, mpsc::UnboundedReceiver<FolderEvent>), WatcherError> {
        if let Some(missing) = roots.iter().find(|root| !root.is_dir()) {
            return Err(WatcherError::SourceMissing(missing.clone()));
        }

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let resolver = RootResolver::new(&roots);

        let mut debouncer = new_debouncer(DEBOUNCE_TIMEOUT, None, move |result| {
            Self::handle_debounce_result(result, &resolver, &event_tx);
        })?;

        for root in &roots {
            debouncer.watch(root, RecursiveMode::Recursive)?;
        }
        tracing::info!(folders = roots.len(), "Watching source folders");

        Ok((
            Self {
                roots,
                debouncer: Some(debouncer),
            },
            event_rx,
        ))
    }

    /// Handle a debounce result from notify.
    fn handle_debounce_result(
        result: DebounceEventResult,
        resolver: &RootResolver,
        event_tx: &mpsc::UnboundedSender<FolderEvent>,
    ) {
        match result {
            Ok(events) => {
                let mut changed: Vec<&PathBuf> = Vec::new();
                for event in &events {
                    if !Self::is_relevant(&event.kind) {
                        continue;
                    }
                    for path in &event.paths {
                        tracing::debug!(kind = ?event.kind, path = %path.display(), "Detected change");
                        for root in resolver.roots_for(path) {
                            if !changed.contains(&root) {
                                changed.push(root);
                            }
                        }
                    }
                }
                for root in changed {
                    let _ = event_tx.send(FolderEvent::Changed(root.clone()));
                }
            }
            Err(errors) => {
                for error in errors {
                    let _ = event_tx.send(FolderEvent::Error(WatcherError::Notify(error)));
                }
            }
        }
    }

    /// Creations, removals and renames change what should be linked.
    fn is_relevant(kind: &EventKind) -> bool {
        matches!(
            kind,
            EventKind::Create(_) | EventKind::Remove(_) | EventKind::Modify(ModifyKind::Name(_))
        )
    }

    /// Get the folders being watched.
    #[must_use]
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Stop delivering events. The event receiver closes once drained.
    pub fn stop(&mut self) {
        if let Some(debouncer) = self.debouncer.take() {
            debouncer.stop();
            tracing::debug!("Folder watcher stopped");
        }
    }
}

impl std::fmt::Debug for FolderWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FolderWatcher")
            .field("roots", &self.roots)
            .field("running", &self.debouncer.is_some())
            .finish()
    }
}
