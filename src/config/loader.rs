//! Configuration file loader and validation.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::jobs::Job;

use super::types::{LinkarrConfig, LogLevel, MediaServerFormat, RunMode};

/// Validated configuration with compiled jobs.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Jobs in config file order.
    pub jobs: Vec<Job>,
    pub mode: RunMode,
    pub media_server_format: MediaServerFormat,
    pub log_level: LogLevel,
}

impl Settings {
    /// Jobs that take part in runs.
    pub fn enabled_jobs(&self) -> impl Iterator<Item = &Job> {
        self.jobs.iter().filter(|job| job.is_enabled())
    }
}

impl TryFrom<LinkarrConfig> for Settings {
    type Error = ConfigError;

    fn try_from(config: LinkarrConfig) -> Result<Self, Self::Error> {
        let mut seen = HashSet::new();
        let mut jobs = Vec::with_capacity(config.jobs.len());

        for (index, job) in config.jobs.iter().enumerate() {
            if job.src.as_os_str().is_empty() {
                return Err(ConfigError::EmptyField {
                    index,
                    field: "src",
                });
            }
            if job.dest.as_os_str().is_empty() {
                return Err(ConfigError::EmptyField {
                    index,
                    field: "dest",
                });
            }
            if !seen.insert(job.src.clone()) {
                return Err(ConfigError::DuplicateSource(job.src.clone()));
            }

            let compiled = Job::from_config(job).map_err(|source| ConfigError::InvalidPattern {
                index,
                pattern: job.file_type_regex.clone(),
                source,
            })?;
            jobs.push(compiled);
        }

        Ok(Self {
            jobs,
            mode: config.mode,
            media_server_format: config.media_server_format,
            log_level: config.log_level,
        })
    }
}

/// Configuration loader that searches multiple locations.
#[derive(Debug)]
pub struct ConfigLoader {
    /// Search paths in order of priority.
    search_paths: Vec<PathBuf>,
}

impl ConfigLoader {
    /// Create a new config loader with default search paths.
    #[must_use]
    pub fn new() -> Self {
        let mut search_paths = vec![PathBuf::from("linkarr.toml"), PathBuf::from("linkarr.json")];

        if let Some(config_dir) = dirs::config_dir() {
            let dir = config_dir.join("linkarr");
            search_paths.push(dir.join("config.toml"));
            search_paths.push(dir.join("config.json"));
        }

        Self { search_paths }
    }

    /// Create a config loader with a specific config file path.
    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            search_paths: vec![path],
        }
    }

    /// Load and validate configuration from the first available file.
    ///
    /// # Errors
    ///
    /// Returns an error if no config file exists, if it cannot be read or
    /// parsed, or if a job is invalid.
    pub fn load(&self) -> Result<Settings, ConfigError> {
        Settings::try_from(self.load_raw()?)
    }

    /// Load the configuration file without validating jobs.
    ///
    /// # Errors
    ///
    /// Returns an error if no config file exists or it cannot be parsed.
    pub fn load_raw(&self) -> Result<LinkarrConfig, ConfigError> {
        let path = self.find_config_file().ok_or_else(|| ConfigError::NotFound {
            searched: self
                .search_paths
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
        })?;
        tracing::debug!(path = %path.display(), "Loading config file");
        Self::load_from_path(&path)
    }

    /// Load configuration from a specific path.
    ///
    /// `.toml` files are parsed as TOML, anything else as JSON.
    fn load_from_path(path: &Path) -> Result<LinkarrConfig, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let is_toml = path.extension().is_some_and(|ext| ext == "toml");
        if is_toml {
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                source: e,
            })
        } else {
            serde_json::from_str(&content).map_err(|e| ConfigError::JsonError {
                path: path.to_path_buf(),
                source: e,
            })
        }
    }

    /// Get the search paths for debugging.
    #[must_use]
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Find the first config file that exists.
    #[must_use]
    pub fn find_config_file(&self) -> Option<PathBuf> {
        self.search_paths.iter().find(|p| p.exists()).cloned()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("No config file found (searched: {searched})")]
    NotFound { searched: String },

    #[error("Failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    JsonError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Job {index}: '{field}' must not be empty")]
    EmptyField { index: usize, field: &'static str },

    #[error("Job {index}: invalid file_type_regex '{pattern}': {source}")]
    InvalidPattern {
        index: usize,
        pattern: String,
        source: regex::Error,
    },

    #[error("Source directory used by more than one job: {}", .0.display())]
    DuplicateSource(PathBuf),
}
