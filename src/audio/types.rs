//! Audio-related small types and handles.
//!
//! This module defines the commands sent to the audio thread, the events it
//! reports back and the playback info shared with the UI.

use std::fs::File;
use std::io::BufReader;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rodio::Decoder;

/// A decoded, ready-to-play source.
pub type AudioSource = Decoder<BufReader<File>>;

/// Transport state of the engine, reported alongside play/pause changes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PlaybackStatus {
    /// Nothing loaded.
    #[default]
    Idle,
    /// An item is loaded and can play.
    Ready,
    /// The loaded item played to its natural end.
    Ended,
}

/// Events emitted by a playback engine.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlayerEvent {
    IsPlayingChanged(bool),
    PlaybackStateChanged(PlaybackStatus),
}

pub(super) enum AudioCmd {
    /// Replace the current item with `source`, paused.
    Load { source: AudioSource, media_id: String },
    Prepare,
    Play,
    Pause,
    /// Halt playback and release the sink; the item id stays set.
    Stop,
    /// Drop the loaded item.
    Clear,
    Quit,
}

#[derive(Debug, Clone, Default)]
/// Runtime playback information shared with the UI.
pub struct PlaybackInfo {
    /// Elapsed playback time for the loaded item.
    pub elapsed: Duration,
    /// Whether playback is currently active.
    pub playing: bool,
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;
