//! linkarr - organize media libraries with relative symlinks.

pub mod config;
pub mod jobs;
pub mod links;
pub mod media;
pub mod watcher;
