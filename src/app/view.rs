use std::time::Duration;

use crate::library::{format_duration, format_elapsed, subtitle};
use crate::store::UiState;

pub const NO_TRACK_SELECTED: &str = "No track selected";

/// One rendered line of the track list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub title: String,
    pub subtitle: String,
    pub duration: String,
    pub is_now_playing: bool,
}

/// Everything the renderer needs, derived from one [`UiState`] snapshot plus
/// the presentation's own cursor and notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModel {
    pub rows: Vec<Row>,
    pub cursor: usize,
    pub show_loading: bool,
    pub show_empty: bool,
    pub refresh_enabled: bool,
    pub transport_enabled: bool,
    pub play_pause_label: &'static str,
    pub now_playing_title: String,
    pub now_playing_subtitle: String,
    pub elapsed: Option<String>,
    pub notice: Option<String>,
}

impl ViewModel {
    pub fn derive(
        state: &UiState,
        cursor: usize,
        elapsed: Duration,
        notice: Option<&str>,
    ) -> Self {
        let rows = state
            .tracks
            .iter()
            .map(|t| Row {
                title: t.title.clone(),
                subtitle: format!("{} • {}", t.artist, t.album),
                duration: format_duration(t.duration_ms),
                is_now_playing: state.now_playing.as_ref().is_some_and(|p| p.same_item(t)),
            })
            .collect();

        let has_selection = state.has_selection();
        Self {
            rows,
            cursor,
            show_loading: state.is_loading,
            show_empty: state.is_empty(),
            refresh_enabled: !state.is_loading,
            transport_enabled: has_selection,
            play_pause_label: if state.is_playing { "Pause" } else { "Play" },
            now_playing_title: state
                .now_playing
                .as_ref()
                .map(|t| t.title.clone())
                .unwrap_or_else(|| NO_TRACK_SELECTED.to_string()),
            now_playing_subtitle: state.now_playing.as_ref().map(subtitle).unwrap_or_default(),
            elapsed: has_selection.then(|| format_elapsed(elapsed)),
            notice: notice.map(str::to_string),
        }
    }
}
