//! TV episode file name parsing.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use super::identity::{ParsedIdentity, TvIdentity};
use super::parser::{file_name, normalize_title, MediaParser, DELIM_CLASS};

/// `<series><delim>[<year><delim>?]S<NN>E<NN><rest>`, case-insensitive.
static TV_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let delim = DELIM_CLASS;
    let pattern = format!(
        r"(?i)^(?P<series>.+?){delim}(?:\d{{4}}{delim}?)?s(?P<season>\d{{2}})e(?P<episode>\d{{2}}).*$"
    );
    Regex::new(&pattern).expect("TV pattern is valid")
});

/// Parses `Series.Name.S01E02.ext` style names.
///
/// A year between the series name and the episode marker is dropped so that
/// `Show.2019.S01E01` and `Show.S02E01` land in the same series folder.
#[derive(Debug, Clone, Copy, Default)]
pub struct TvParser;

impl TvParser {
    /// Parse a bare file name.
    #[must_use]
    pub fn parse_name(&self, name: &str) -> Option<TvIdentity> {
        let captures = TV_PATTERN.captures(name)?;
        Some(TvIdentity {
            series_name: normalize_title(&captures["series"]),
            season: captures["season"].to_string(),
            episode: captures["episode"].to_string(),
        })
    }
}

impl MediaParser for TvParser {
    fn parse_info(&self, path: &Path) -> Option<ParsedIdentity> {
        file_name(path)
            .and_then(|name| self.parse_name(name))
            .map(ParsedIdentity::Tv)
    }
}
