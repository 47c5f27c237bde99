//! Filename parser selection and shared name normalization.

use std::path::{Path, PathBuf};

use crate::config::MediaType;

use super::identity::ParsedIdentity;
use super::movie::MovieParser;
use super::tv::TvParser;

/// Characters that separate words in release-style file names.
pub(crate) const DELIMITERS: [char; 2] = [' ', '.'];

/// Regex character class matching one delimiter.
pub(crate) const DELIM_CLASS: &str = "[ .]";

/// Extracts a structured identity from a media file path.
pub trait MediaParser {
    /// Parse the file name component of `path`.
    ///
    /// Returns `None` when the name does not follow the expected pattern.
    fn parse_info(&self, path: &Path) -> Option<ParsedIdentity>;

    /// Directory under `root` where a link to `path` belongs.
    fn destination(&self, path: &Path, root: &Path) -> Option<PathBuf> {
        self.parse_info(path)
            .map(|identity| identity.destination(root))
    }
}

/// Parser chosen from a job's media type.
#[derive(Debug, Clone, Copy)]
pub enum FilenameParser {
    Tv(TvParser),
    Movie(MovieParser),
}

impl FilenameParser {
    /// Select the parser for a media type.
    #[must_use]
    pub fn for_media_type(media_type: MediaType) -> Self {
        match media_type {
            MediaType::Tv => Self::Tv(TvParser),
            MediaType::Movie => Self::Movie(MovieParser),
        }
    }

    /// Media type handled by this parser.
    #[must_use]
    pub fn media_type(&self) -> MediaType {
        match self {
            Self::Tv(_) => MediaType::Tv,
            Self::Movie(_) => MediaType::Movie,
        }
    }
}

impl MediaParser for FilenameParser {
    fn parse_info(&self, path: &Path) -> Option<ParsedIdentity> {
        match self {
            Self::Tv(parser) => parser.parse_info(path),
            Self::Movie(parser) => parser.parse_info(path),
        }
    }
}

/// File name of `path` as UTF-8, if it has one.
pub(crate) fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|name| name.to_str())
}

/// Turn a raw captured name into a display title.
///
/// Each delimiter becomes a space, surrounding whitespace is trimmed and
/// every whitespace-separated word is title-cased.
pub(crate) fn normalize_title(raw: &str) -> String {
    let spaced: String = raw
        .chars()
        .map(|c| if DELIMITERS.contains(&c) { ' ' } else { c })
        .collect();
    title_case(spaced.trim())
}

fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut word_start = true;
    for c in text.chars() {
        if c.is_whitespace() {
            out.push(c);
            word_start = true;
        } else if word_start {
            out.extend(c.to_uppercase());
            word_start = false;
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}
