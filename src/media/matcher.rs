//! File eligibility matching.

use regex::{Regex, RegexBuilder};

/// Pattern used when a job does not configure one.
pub const DEFAULT_INCLUDE_PATTERN: &str = r".*\.(mkv|mp4|avi)$";

/// Decides whether a file name is eligible for organizing.
///
/// The pattern is matched case-insensitively against the whole file name,
/// never as a substring search.
#[derive(Debug, Clone)]
pub struct PathMatcher {
    source: String,
    pattern: Regex,
}

impl PathMatcher {
    /// Compile a matcher from an include pattern.
    ///
    /// # Errors
    ///
    /// Returns `regex::Error` if the pattern is not a valid regular expression.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let anchored = format!("^(?:{pattern})$");
        let compiled = RegexBuilder::new(&anchored)
            .case_insensitive(true)
            .build()?;
        Ok(Self {
            source: pattern.to_string(),
            pattern: compiled,
        })
    }

    /// Check whether `file_name` matches the include pattern.
    #[must_use]
    pub fn is_eligible(&self, file_name: &str) -> bool {
        self.pattern.is_match(file_name)
    }

    /// The pattern as configured, without anchoring.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.source
    }
}

impl Default for PathMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_INCLUDE_PATTERN).expect("default include pattern is valid")
    }
}
