use std::path::PathBuf;
use std::time::Duration;

use crate::error::PlaybackError;
use crate::library::Track;

use super::types::PlayerEvent;

/// Description of a playable item handed to a [`PlaybackEngine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaItem {
    pub locator: PathBuf,
    pub media_id: String,
    pub title: String,
    pub artist: String,
    pub album: String,
}

impl From<&Track> for MediaItem {
    fn from(track: &Track) -> Self {
        Self {
            locator: track.locator.clone(),
            media_id: track.id.to_string(),
            title: track.title.clone(),
            artist: track.artist.clone(),
            album: track.album.clone(),
        }
    }
}

/// The component that decodes and outputs audio.
///
/// Transport calls are fire-and-forget; state changes come back through
/// [`PlaybackEngine::poll_events`].
pub trait PlaybackEngine {
    /// Replace the current item. Fails when the item cannot be opened or decoded.
    fn set_media_item(&mut self, item: MediaItem) -> Result<(), PlaybackError>;
    fn prepare(&mut self);
    fn play(&mut self);
    fn pause(&mut self);
    fn stop(&mut self);
    fn clear_media_items(&mut self);
    fn is_playing(&self) -> bool;
    fn media_item_count(&self) -> usize;
    /// Elapsed time of the current item.
    fn elapsed(&self) -> Duration;
    /// Drain events emitted since the last call, oldest first.
    fn poll_events(&mut self) -> Vec<PlayerEvent>;
    /// Free the output device. The engine is unusable afterwards.
    fn release(&mut self);
}

/// Engine used when no audio output could be opened: every item fails to load.
pub struct UnavailableEngine {
    reason: PlaybackError,
}

impl UnavailableEngine {
    pub fn new(reason: PlaybackError) -> Self {
        Self { reason }
    }
}

impl PlaybackEngine for UnavailableEngine {
    fn set_media_item(&mut self, _item: MediaItem) -> Result<(), PlaybackError> {
        Err(self.reason.clone())
    }

    fn prepare(&mut self) {}

    fn play(&mut self) {}

    fn pause(&mut self) {}

    fn stop(&mut self) {}

    fn clear_media_items(&mut self) {}

    fn is_playing(&self) -> bool {
        false
    }

    fn media_item_count(&self) -> usize {
        0
    }

    fn elapsed(&self) -> Duration {
        Duration::ZERO
    }

    fn poll_events(&mut self) -> Vec<PlayerEvent> {
        Vec::new()
    }

    fn release(&mut self) {}
}
