use std::fmt;
use std::path::PathBuf;

/// Opaque stable key assigned by the media index.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackId(pub u64);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One playable audio item as produced by the repository.
///
/// Equality is structural (used when diffing lists); use [`Track::same_item`]
/// when only the identity matters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    pub artist: String,
    pub album: String,
    /// Milliseconds, exactly as reported by the index.
    pub duration_ms: i64,
    pub locator: PathBuf,
}

impl Track {
    pub fn same_item(&self, other: &Track) -> bool {
        self.id == other.id
    }
}

/// One raw row of the media index, before placeholder substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRow {
    pub id: TrackId,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration_ms: i64,
    pub locator: PathBuf,
    pub is_music: bool,
}
