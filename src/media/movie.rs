//! Movie file name parsing.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use super::identity::{MovieIdentity, ParsedIdentity};
use super::parser::{file_name, normalize_title, MediaParser, DELIM_CLASS};

/// `<title><delim><YYYY><delim><rest>`.
static MOVIE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let delim = DELIM_CLASS;
    let pattern = format!(r"^(?P<title>.+?){delim}(?P<year>\d{{4}}){delim}.*$");
    Regex::new(&pattern).expect("movie pattern is valid")
});

/// Parses `Movie.Title.2023.1080p.ext` style names.
#[derive(Debug, Clone, Copy, Default)]
pub struct MovieParser;

impl MovieParser {
    /// Parse a bare file name.
    #[must_use]
    pub fn parse_name(&self, name: &str) -> Option<MovieIdentity> {
        let captures = MOVIE_PATTERN.captures(name)?;
        Some(MovieIdentity {
            title: normalize_title(&captures["title"]),
            year: captures["year"].to_string(),
        })
    }
}

impl MediaParser for MovieParser {
    fn parse_info(&self, path: &Path) -> Option<ParsedIdentity> {
        file_name(path)
            .and_then(|name| self.parse_name(name))
            .map(ParsedIdentity::Movie)
    }
}
