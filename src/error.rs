//! Error types shared across the library, store and playback layers.
//!
//! Every error here is recovered at the boundary where it occurs: load
//! failures become a message in the UI state, playback failures become a
//! fixed notice. Nothing propagates far enough to end the process.

use std::path::PathBuf;

/// Failure to read the media index.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    /// The library root cannot be read by this process.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Any other failure while scanning the index.
    #[error("{0}")]
    Query(String),
}

impl LoadError {
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query(message.into())
    }

    /// Map an I/O error raised while touching `path`.
    pub fn from_io(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        let path = path.into();
        match err.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            _ => Self::Query(format!("{}: {}", path.display(), err)),
        }
    }
}

/// Failure to construct or start playback.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlaybackError {
    #[error("audio output initialization failed: {0}")]
    AudioInit(String),

    #[error("failed to open {}: {message}", path.display())]
    Open { path: PathBuf, message: String },

    #[error("failed to decode {}: {message}", path.display())]
    Decode { path: PathBuf, message: String },

    #[error("audio thread is gone")]
    ChannelClosed,
}
