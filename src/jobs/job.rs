//! Runtime job descriptor.

use std::path::{Path, PathBuf};

use crate::config::{JobConfig, MediaType};
use crate::media::{FilenameParser, PathMatcher};

/// One organization rule, ready to run.
///
/// Identified by its source directory. Immutable once built.
#[derive(Debug, Clone)]
pub struct Job {
    source: PathBuf,
    dest: PathBuf,
    media_type: MediaType,
    matcher: PathMatcher,
    parser: FilenameParser,
    enabled: bool,
}

impl Job {
    /// Build an enabled job.
    #[must_use]
    pub fn new(
        source: impl Into<PathBuf>,
        dest: impl Into<PathBuf>,
        media_type: MediaType,
        matcher: PathMatcher,
    ) -> Self {
        Self {
            source: source.into(),
            dest: dest.into(),
            media_type,
            matcher,
            parser: FilenameParser::for_media_type(media_type),
            enabled: true,
        }
    }

    /// Build a job from its config entry.
    ///
    /// # Errors
    ///
    /// Returns `regex::Error` if the include pattern does not compile.
    pub fn from_config(config: &JobConfig) -> Result<Self, regex::Error> {
        let matcher = PathMatcher::new(&config.file_type_regex)?;
        Ok(Self::new(&config.src, &config.dest, config.media_type, matcher)
            .with_enabled(config.enabled))
    }

    /// Set whether the job takes part in runs.
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    #[must_use]
    pub fn dest(&self) -> &Path {
        &self.dest
    }

    #[must_use]
    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    #[must_use]
    pub fn matcher(&self) -> &PathMatcher {
        &self.matcher
    }

    /// Parser selected from the media type.
    #[must_use]
    pub fn parser(&self) -> &FilenameParser {
        &self.parser
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config() {
        let config = JobConfig {
            src: PathBuf::from("/downloads/movies"),
            dest: PathBuf::from("/media/movies"),
            media_type: MediaType::Movie,
            file_type_regex: r".*\.mkv$".to_string(),
            enabled: false,
        };
        let job = Job::from_config(&config).unwrap();

        assert_eq!(job.source(), Path::new("/downloads/movies"));
        assert_eq!(job.dest(), Path::new("/media/movies"));
        assert_eq!(job.media_type(), MediaType::Movie);
        assert_eq!(job.parser().media_type(), MediaType::Movie);
        assert_eq!(job.matcher().pattern(), r".*\.mkv$");
        assert!(!job.is_enabled());
    }

    #[test]
    fn test_from_config_invalid_pattern() {
        let config = JobConfig {
            src: PathBuf::from("a"),
            dest: PathBuf::from("b"),
            media_type: MediaType::Tv,
            file_type_regex: "[".to_string(),
            enabled: true,
        };
        assert!(Job::from_config(&config).is_err());
    }

    #[test]
    fn test_new_is_enabled() {
        let job = Job::new("/src", "/dest", MediaType::Tv, PathMatcher::default());
        assert!(job.is_enabled());
        assert_eq!(job.parser().media_type(), MediaType::Tv);
    }
}
