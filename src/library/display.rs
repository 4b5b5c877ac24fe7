use std::time::Duration;

use super::model::Track;

/// Format a millisecond duration as `m:ss`.
///
/// The index passes durations through unvalidated; negative values render
/// as `0:00` here without being altered anywhere else.
pub fn format_duration(duration_ms: i64) -> String {
    let total_seconds = (duration_ms / 1000).max(0);
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// Format an elapsed playback time as `m:ss`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Second line shown under a track title: artist, album and duration.
pub fn subtitle(track: &Track) -> String {
    format!(
        "{} • {} • {}",
        track.artist,
        track.album,
        format_duration(track.duration_ms)
    )
}
