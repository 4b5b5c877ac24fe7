use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use crate::error::LoadError;

use super::index::MediaIndex;
use super::model::{IndexRow, Track};

pub const DEFAULT_TITLE: &str = "Unknown title";
pub const DEFAULT_ARTIST: &str = "Unknown artist";
pub const DEFAULT_ALBUM: &str = "Unknown album";

/// Result of one full index scan.
pub type LoadResult = Result<Vec<Track>, LoadError>;

/// Maps media index rows into [`Track`] values. No caching: every load
/// re-scans the whole index.
#[derive(Clone)]
pub struct TrackRepository {
    index: Arc<dyn MediaIndex>,
}

impl TrackRepository {
    pub fn new(index: Arc<dyn MediaIndex>) -> Self {
        Self { index }
    }

    pub fn check_access(&self) -> Result<(), LoadError> {
        self.index.check_access()
    }

    /// Load every music track, sorted by title (case-insensitive, ascending).
    pub fn load_all(&self) -> LoadResult {
        let rows = self.index.query()?;
        Ok(tracks_from_rows(rows))
    }

    /// Run [`TrackRepository::load_all`] on a worker thread.
    pub fn spawn_load(&self) -> PendingLoad {
        let (tx, rx) = mpsc::channel();
        let repo = self.clone();
        let spawned = thread::Builder::new()
            .name("encore-load".into())
            .spawn(move || {
                let result = repo.load_all();
                // The receiver may be gone; the result is then simply never observed.
                let _ = tx.send(result);
            });

        match spawned {
            Ok(_) => PendingLoad { rx, done: false },
            Err(e) => {
                // No worker: complete immediately with the failure.
                let (tx, rx) = mpsc::channel();
                let _ = tx.send(Err(LoadError::query(format!("failed to start scan: {e}"))));
                PendingLoad { rx, done: false }
            }
        }
    }
}

/// Handle to a load running on a worker thread.
pub struct PendingLoad {
    rx: Receiver<LoadResult>,
    done: bool,
}

impl PendingLoad {
    /// Return the load's outcome once it has finished. Yields `Some` exactly once.
    pub fn try_complete(&mut self) -> Option<LoadResult> {
        if self.done {
            return None;
        }
        match self.rx.try_recv() {
            Ok(result) => {
                self.done = true;
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.done = true;
                Some(Err(LoadError::query("scan worker exited unexpectedly")))
            }
        }
    }

    /// Block until the load finishes.
    #[cfg(test)]
    pub fn wait(self) -> LoadResult {
        self.rx
            .recv()
            .unwrap_or_else(|_| Err(LoadError::query("scan worker exited unexpectedly")))
    }

    pub fn is_done(&self) -> bool {
        self.done
    }
}

fn or_placeholder(value: Option<String>, placeholder: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => placeholder.to_string(),
    }
}

/// Keep music rows, substitute placeholders and sort by title.
pub fn tracks_from_rows(rows: Vec<IndexRow>) -> Vec<Track> {
    let mut tracks: Vec<Track> = rows
        .into_iter()
        .filter(|r| r.is_music)
        .map(|r| Track {
            id: r.id,
            title: or_placeholder(r.title, DEFAULT_TITLE),
            artist: or_placeholder(r.artist, DEFAULT_ARTIST),
            album: or_placeholder(r.album, DEFAULT_ALBUM),
            duration_ms: r.duration_ms,
            locator: r.locator,
        })
        .collect();

    tracks.sort_by_cached_key(|t| t.title.to_lowercase());
    tracks
}
