//! Watcher module for job source folders.
//!
//! Turns filesystem notifications into per-job re-runs.

mod error;
mod folder_watcher;
mod state;
mod watch_loop;

pub use error::WatcherError;
pub use folder_watcher::{FolderEvent, FolderWatcher, DEBOUNCE_TIMEOUT};
pub use state::{DispatchState, DispatchStateMachine, DispatchStats};
pub use watch_loop::{JobReport, Trigger, WatchLoop, WatchStats};
