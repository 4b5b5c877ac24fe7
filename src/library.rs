//! Local music library: the media index, the track repository and the
//! small formatting helpers used to render tracks.

mod diff;
mod display;
mod index;
mod model;
mod repository;

pub use diff::{diff_tracks, position_of};
pub use display::{format_duration, format_elapsed, subtitle};
pub use index::{DirectoryIndex, MediaIndex};
#[cfg(test)]
pub use index::MemoryIndex;
pub use model::{IndexRow, Track, TrackId};
pub use repository::{PendingLoad, TrackRepository};

#[cfg(test)]
mod tests;
