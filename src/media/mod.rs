//! Media file recognition.
//!
//! Decides which files are eligible, extracts a TV or movie identity from
//! their names and maps that identity to a canonical library directory.

mod identity;
mod matcher;
mod movie;
mod parser;
mod tv;

pub use identity::{MovieIdentity, ParsedIdentity, TvIdentity};
pub use matcher::{PathMatcher, DEFAULT_INCLUDE_PATTERN};
pub use movie::MovieParser;
pub use parser::{FilenameParser, MediaParser};
pub use tv::TvParser;
