use super::*;
use super::repository::{DEFAULT_ALBUM, DEFAULT_ARTIST, DEFAULT_TITLE, tracks_from_rows};
use crate::error::LoadError;
use proptest::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

fn row(id: u64, title: Option<&str>, artist: Option<&str>, album: Option<&str>) -> IndexRow {
    IndexRow {
        id: TrackId(id),
        title: title.map(str::to_string),
        artist: artist.map(str::to_string),
        album: album.map(str::to_string),
        duration_ms: 1000 * id as i64,
        locator: PathBuf::from(format!("/music/{id}.mp3")),
        is_music: true,
    }
}

fn track(id: u64, title: &str) -> Track {
    Track {
        id: TrackId(id),
        title: title.into(),
        artist: "Artist".into(),
        album: "Album".into(),
        duration_ms: 60_000,
        locator: PathBuf::from(format!("/music/{id}.mp3")),
    }
}

fn repo(rows: Vec<IndexRow>) -> TrackRepository {
    TrackRepository::new(Arc::new(MemoryIndex::new(rows)))
}

#[test]
fn placeholders_replace_only_missing_or_blank_fields() {
    let tracks = repo(vec![
        row(1, None, Some("Band"), Some("   ")),
        row(2, Some("Song"), Some(""), None),
    ])
    .load_all()
    .unwrap();

    let first = tracks.iter().find(|t| t.id == TrackId(1)).unwrap();
    assert_eq!(first.title, DEFAULT_TITLE);
    assert_eq!(first.artist, "Band");
    assert_eq!(first.album, DEFAULT_ALBUM);

    let second = tracks.iter().find(|t| t.id == TrackId(2)).unwrap();
    assert_eq!(second.title, "Song");
    assert_eq!(second.artist, DEFAULT_ARTIST);
    assert_eq!(second.album, DEFAULT_ALBUM);
}

#[test]
fn non_music_rows_are_dropped() {
    let mut ringtone = row(3, Some("Beep"), None, None);
    ringtone.is_music = false;
    let tracks = repo(vec![row(1, Some("Tune"), None, None), ringtone])
        .load_all()
        .unwrap();
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].title, "Tune");
}

#[test]
fn negative_duration_passes_through() {
    let mut broken = row(1, Some("Broken"), None, None);
    broken.duration_ms = -5000;
    let tracks = repo(vec![broken]).load_all().unwrap();
    assert_eq!(tracks[0].duration_ms, -5000);
    assert_eq!(format_duration(tracks[0].duration_ms), "0:00");
}

#[test]
fn load_all_sorts_case_insensitively() {
    let tracks = repo(vec![
        row(1, Some("beta"), None, None),
        row(2, Some("Alpha"), None, None),
        row(3, Some("Gamma"), None, None),
        row(4, Some("alpha two"), None, None),
    ])
    .load_all()
    .unwrap();
    let titles: Vec<&str> = tracks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["Alpha", "alpha two", "beta", "Gamma"]);
}

#[test]
fn load_all_propagates_query_failure() {
    let index = MemoryIndex::failing(LoadError::query("disk gone"));
    let repo = TrackRepository::new(Arc::new(index));
    assert_eq!(repo.load_all(), Err(LoadError::query("disk gone")));
}

#[test]
fn spawn_load_delivers_the_result_once() {
    let repo = repo(vec![row(1, Some("Only"), None, None)]);
    let mut pending = repo.spawn_load();

    let result = loop {
        if let Some(result) = pending.try_complete() {
            break result;
        }
        std::thread::sleep(Duration::from_millis(5));
    };
    assert_eq!(result.unwrap().len(), 1);
    assert!(pending.is_done());
    assert!(pending.try_complete().is_none());
}

#[test]
fn spawn_load_wait_returns_failure() {
    let index = MemoryIndex::failing(LoadError::query("boom"));
    let repo = TrackRepository::new(Arc::new(index));
    assert_eq!(repo.spawn_load().wait(), Err(LoadError::query("boom")));
}

#[test]
fn format_duration_renders_minutes_and_seconds() {
    assert_eq!(format_duration(0), "0:00");
    assert_eq!(format_duration(59_999), "0:59");
    assert_eq!(format_duration(61_000), "1:01");
    assert_eq!(format_duration(3_600_000), "60:00");
    assert_eq!(format_elapsed(Duration::from_secs(125)), "2:05");
}

#[test]
fn subtitle_joins_artist_album_duration() {
    assert_eq!(subtitle(&track(1, "Song")), "Artist • Album • 1:00");
}

#[test]
fn diff_tracks_by_identifier() {
    let old = vec![track(1, "A"), track(2, "B"), track(3, "C")];
    let mut renamed = track(2, "B (remaster)");
    renamed.duration_ms = 61_000;
    let new = vec![track(1, "A"), renamed, track(4, "D")];

    let diff = diff_tracks(&old, &new);
    assert_eq!(diff.inserted, vec![TrackId(4)]);
    assert_eq!(diff.removed, vec![TrackId(3)]);
    assert_eq!(diff.changed, vec![TrackId(2)]);
    assert!(!diff.is_empty());
    assert!(diff_tracks(&new, &new).is_empty());
}

#[test]
fn same_item_compares_identity_only() {
    let a = track(7, "Seven");
    let mut b = track(7, "Seven, retagged");
    b.album = "Other".into();
    assert!(a.same_item(&b));
    assert_ne!(a, b);
    assert_eq!(position_of(&[track(1, "x"), a.clone()], TrackId(7)), Some(1));
}

fn field() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some(String::new())),
        Just(Some("  \t ".to_string())),
        "[A-Za-z][A-Za-z ]{0,12}".prop_map(Some),
    ]
}

fn rows_strategy() -> impl Strategy<Value = Vec<IndexRow>> {
    prop::collection::vec((field(), field(), field()), 0..24).prop_map(|fields| {
        fields
            .into_iter()
            .enumerate()
            .map(|(i, (title, artist, album))| IndexRow {
                id: TrackId(i as u64),
                title,
                artist,
                album,
                duration_ms: i as i64 * 1000,
                locator: PathBuf::from(format!("/music/{i}.mp3")),
                is_music: true,
            })
            .collect()
    })
}

fn expected(value: &Option<String>, placeholder: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.clone(),
        _ => placeholder.to_string(),
    }
}

proptest! {
    #[test]
    fn placeholder_substitution_is_per_field(rows in rows_strategy()) {
        let tracks = tracks_from_rows(rows.clone());
        prop_assert_eq!(tracks.len(), rows.len());
        for r in &rows {
            let t = tracks.iter().find(|t| t.id == r.id).unwrap();
            prop_assert_eq!(&t.title, &expected(&r.title, DEFAULT_TITLE));
            prop_assert_eq!(&t.artist, &expected(&r.artist, DEFAULT_ARTIST));
            prop_assert_eq!(&t.album, &expected(&r.album, DEFAULT_ALBUM));
            prop_assert_eq!(t.duration_ms, r.duration_ms);
        }
    }

    #[test]
    fn output_is_sorted_for_any_permutation(
        rows in rows_strategy().prop_shuffle()
    ) {
        let tracks = tracks_from_rows(rows);
        for pair in tracks.windows(2) {
            prop_assert!(pair[0].title.to_lowercase() <= pair[1].title.to_lowercase());
        }
    }
}
