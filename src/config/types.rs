//! Configuration types.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::media::DEFAULT_INCLUDE_PATTERN;

/// Kind of media a job organizes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[default]
    Tv,
    Movie,
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tv => f.write_str("tv"),
            Self::Movie => f.write_str("movie"),
        }
    }
}

/// How the process runs its jobs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Run every job once, then keep re-running jobs whose source changes.
    #[default]
    Watch,
    /// Run every job once and exit.
    Once,
}

/// Library layout convention of the target media server.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MediaServerFormat {
    #[default]
    Jellyfin,
}

/// Log verbosity configured in the file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`.
    #[must_use]
    pub fn as_filter(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warn",
            Self::Error | Self::Critical => "error",
        }
    }
}

/// One organization rule as written in the config file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobConfig {
    /// Directory scanned for media files.
    pub src: PathBuf,
    /// Library root that receives the links.
    pub dest: PathBuf,
    #[serde(default)]
    pub media_type: MediaType,
    /// Pattern a file name must match to be organized.
    #[serde(default = "default_file_type_regex")]
    pub file_type_regex: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_file_type_regex() -> String {
    DEFAULT_INCLUDE_PATTERN.to_string()
}

fn default_enabled() -> bool {
    true
}

/// Top-level configuration file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinkarrConfig {
    pub jobs: Vec<JobConfig>,
    #[serde(default)]
    pub mode: RunMode,
    #[serde(default)]
    pub media_server_format: MediaServerFormat,
    #[serde(default)]
    pub log_level: LogLevel,
}
