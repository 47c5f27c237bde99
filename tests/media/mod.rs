//! Media recognition tests.

mod naming_test;

/// Verify all public media types are exported from the library.
#[test]
fn test_all_media_types_exported() {
    use linkarr::config::MediaType;
    use linkarr::media::{
        FilenameParser, MediaParser, MovieIdentity, MovieParser, ParsedIdentity, PathMatcher,
        TvIdentity, TvParser, DEFAULT_INCLUDE_PATTERN,
    };

    let _ = PathMatcher::new(DEFAULT_INCLUDE_PATTERN).unwrap();
    let _ = FilenameParser::for_media_type(MediaType::Tv);
    let _: &dyn MediaParser = &TvParser;
    let _: &dyn MediaParser = &MovieParser;

    let _ = ParsedIdentity::Tv(TvIdentity {
        series_name: String::new(),
        season: String::new(),
        episode: String::new(),
    });
    let _ = ParsedIdentity::Movie(MovieIdentity {
        title: String::new(),
        year: String::new(),
    });
}
