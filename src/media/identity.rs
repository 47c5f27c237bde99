//! Parsed media identities and their destination directories.

use std::fmt;
use std::path::{Path, PathBuf};

/// Identity of a TV episode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TvIdentity {
    /// Title-cased series name.
    pub series_name: String,
    /// Two-digit season number, as written in the file name.
    pub season: String,
    /// Two-digit episode number, as written in the file name.
    pub episode: String,
}

/// Identity of a movie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieIdentity {
    /// Title-cased movie title.
    pub title: String,
    /// Four-digit release year.
    pub year: String,
}

/// Structured result of parsing a media file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedIdentity {
    Tv(TvIdentity),
    Movie(MovieIdentity),
}

impl ParsedIdentity {
    /// Canonical directory for this identity under `root`.
    ///
    /// TV episodes land in `root/<Series>/Season <NN>`, movies in
    /// `root/<Title> (<YYYY>)`. Nothing is checked on disk.
    #[must_use]
    pub fn destination(&self, root: &Path) -> PathBuf {
        match self {
            Self::Tv(tv) => root
                .join(&tv.series_name)
                .join(format!("Season {}", tv.season)),
            Self::Movie(movie) => root.join(format!("{} ({})", movie.title, movie.year)),
        }
    }
}

impl fmt::Display for ParsedIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tv(tv) => write!(f, "{} S{}E{}", tv.series_name, tv.season, tv.episode),
            Self::Movie(movie) => write!(f, "{} ({})", movie.title, movie.year),
        }
    }
}

impl From<TvIdentity> for ParsedIdentity {
    fn from(identity: TvIdentity) -> Self {
        Self::Tv(identity)
    }
}

impl From<MovieIdentity> for ParsedIdentity {
    fn from(identity: MovieIdentity) -> Self {
        Self::Movie(identity)
    }
}
