//! Playback engine: the [`PlaybackEngine`] boundary and its `rodio`
//! implementation running on a dedicated audio thread.

mod engine;
mod player;
mod sink;
mod thread;
mod types;

pub use engine::{MediaItem, PlaybackEngine, UnavailableEngine};
pub use player::AudioPlayer;
pub use types::{PlaybackStatus, PlayerEvent};
