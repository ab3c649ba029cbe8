use std::fs;

use chrono::DateTime;
use portfolio_api::videos::providers::youtube::parse_playlist_response;
use portfolio_api::{Category, SourceOrigin};

#[test]
fn playlist_fixture_parses_and_projects_records() {
    let json = fs::read_to_string("tests/fixtures/youtube_playlist.json")
        .expect("missing tests/fixtures/youtube_playlist.json");

    let records = parse_playlist_response(&json, Category::Brand).expect("playlist parse ok");
    assert_eq!(records.len(), 3);

    assert!(
        records.iter().all(|r| r.category == Category::Brand),
        "every record carries the collection's category"
    );
    assert!(
        records.iter().all(|r| r.source == SourceOrigin::Youtube),
        "every record is tagged with the aggregated-platform origin"
    );
    assert!(
        records
            .iter()
            .all(|r| r.link == format!("https://www.youtube.com/watch?v={}", r.id)),
        "playback link is the canonical watch URL"
    );
}

#[test]
fn thumbnail_prefers_maxres_then_high_then_empty() {
    let json = fs::read_to_string("tests/fixtures/youtube_playlist.json").expect("fixture");
    let records = parse_playlist_response(&json, Category::Brand).expect("parse");

    let first = records.iter().find(|r| r.id == "dQw4w9WgXcA").unwrap();
    assert!(first.thumbnail.contains("maxresdefault"));

    let second = records.iter().find(|r| r.id == "xvFZjo5PgG0").unwrap();
    assert!(second.thumbnail.contains("hqdefault"));

    let third = records.iter().find(|r| r.id == "oldcut00001").unwrap();
    assert_eq!(third.thumbnail, "");
}

#[test]
fn malformed_publish_date_sorts_last_instead_of_crashing() {
    let json = fs::read_to_string("tests/fixtures/youtube_playlist.json").expect("fixture");
    let records = parse_playlist_response(&json, Category::Brand).expect("parse");

    let bad = records.iter().find(|r| r.id == "oldcut00001").unwrap();
    assert_eq!(bad.published_at, DateTime::UNIX_EPOCH);
}
