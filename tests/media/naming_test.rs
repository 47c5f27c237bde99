use std::path::{Path, PathBuf};

use linkarr::config::MediaType;
use linkarr::media::{FilenameParser, MediaParser, MovieIdentity, ParsedIdentity, TvIdentity};

fn tv() -> FilenameParser {
    FilenameParser::for_media_type(MediaType::Tv)
}

fn movie() -> FilenameParser {
    FilenameParser::for_media_type(MediaType::Movie)
}

#[test]
fn test_tv_round_trip() {
    let identity = tv().parse_info(Path::new("Show.Name.S01E02.mkv")).unwrap();
    assert_eq!(
        identity,
        ParsedIdentity::Tv(TvIdentity {
            series_name: "Show Name".to_string(),
            season: "01".to_string(),
            episode: "02".to_string(),
        })
    );
    assert_eq!(
        identity.destination(Path::new("/library")),
        PathBuf::from("/library/Show Name/Season 01")
    );
}

#[test]
fn test_movie_round_trip() {
    let identity = movie()
        .parse_info(Path::new("Movie.Title.2023.1080p.x264.mkv"))
        .unwrap();
    assert_eq!(
        identity,
        ParsedIdentity::Movie(MovieIdentity {
            title: "Movie Title".to_string(),
            year: "2023".to_string(),
        })
    );
    assert_eq!(
        identity.destination(Path::new("/library")),
        PathBuf::from("/library/Movie Title (2023)")
    );
}

#[test]
fn test_non_match_is_none_for_both_parsers() {
    let path = Path::new("/downloads/not.a.tv.show.mkv");
    assert!(tv().parse_info(path).is_none());
    assert!(movie().parse_info(path).is_none());
    assert!(tv().destination(path, Path::new("/library")).is_none());
}

#[test]
fn test_marker_case_is_ignored() {
    assert_eq!(
        tv().parse_info(Path::new("Show.Name.S01E02.mkv")),
        tv().parse_info(Path::new("Show.Name.s01e02.mkv"))
    );
}

#[test]
fn test_directories_do_not_affect_parsing() {
    let nested = tv().parse_info(Path::new("/downloads/Season 1/Show.Name.S01E02.mkv"));
    let bare = tv().parse_info(Path::new("Show.Name.S01E02.mkv"));
    assert_eq!(nested, bare);
}
