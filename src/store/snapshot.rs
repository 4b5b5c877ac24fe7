use std::sync::Arc;

use crate::library::Track;

/// The whole observable UI state at one point in time.
///
/// Invariant: `is_playing` implies `now_playing.is_some()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    /// Result of the last completed load, in index sort order.
    pub tracks: Arc<[Track]>,
    pub is_loading: bool,
    /// Pending error text; cleared once it has been shown.
    pub error_message: Option<String>,
    pub now_playing: Option<Track>,
    pub is_playing: bool,
}

impl UiState {
    pub fn has_selection(&self) -> bool {
        self.now_playing.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty() && !self.is_loading
    }
}
