use std::sync::Arc;

use crate::error::LoadError;
use crate::library::{PendingLoad, Track, TrackRepository};

use super::snapshot::UiState;

pub const PERMISSION_DENIED_MESSAGE: &str = "Permission denied: cannot read the music library";

type Listener = Box<dyn FnMut(&Arc<UiState>)>;

/// Handle returned by [`StateStore::subscribe`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SubscriptionId(u64);

/// Holds the current [`UiState`] and notifies listeners on every replacement.
///
/// Single-threaded: all transitions and all notifications happen on the
/// thread that owns the store. Loads run elsewhere and are handed back
/// through [`StateStore::poll_loads`].
pub struct StateStore {
    current: Arc<UiState>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
    in_flight: Vec<PendingLoad>,
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore {
    pub fn new() -> Self {
        Self {
            current: Arc::new(UiState::default()),
            listeners: Vec::new(),
            next_id: 0,
            in_flight: Vec::new(),
        }
    }

    pub fn current(&self) -> Arc<UiState> {
        self.current.clone()
    }

    /// Register `listener`. It receives the current snapshot right away and
    /// every later snapshot in the order transitions are applied.
    pub fn subscribe(&mut self, listener: impl FnMut(&Arc<UiState>) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;

        let mut listener: Listener = Box::new(listener);
        listener(&self.current);
        self.listeners.push((id, listener));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    #[cfg(test)]
    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    fn replace(&mut self, f: impl FnOnce(&UiState) -> UiState) {
        let mut next = f(&self.current);
        if next.now_playing.is_none() {
            next.is_playing = false;
        }
        self.current = Arc::new(next);
        for (_, listener) in self.listeners.iter_mut() {
            listener(&self.current);
        }
    }

    pub fn start_refresh(&mut self) {
        self.replace(|s| UiState {
            is_loading: true,
            error_message: None,
            ..s.clone()
        });
    }

    pub fn refresh_succeeded(&mut self, tracks: Vec<Track>) {
        self.replace(|s| UiState {
            tracks: tracks.into(),
            is_loading: false,
            error_message: None,
            ..s.clone()
        });
    }

    pub fn refresh_failed(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.replace(|s| UiState {
            is_loading: false,
            error_message: Some(message),
            ..s.clone()
        });
    }

    /// Set the selected track. Membership in the current list is not checked.
    pub fn set_now_playing(&mut self, track: Option<Track>) {
        self.replace(|s| UiState {
            now_playing: track,
            ..s.clone()
        });
    }

    /// Set the playing flag. Ignored as `true` while nothing is selected.
    pub fn set_is_playing(&mut self, playing: bool) {
        self.replace(|s| UiState {
            is_playing: playing,
            ..s.clone()
        });
    }

    pub fn clear_error(&mut self) {
        self.replace(|s| UiState {
            error_message: None,
            ..s.clone()
        });
    }

    /// Start a load through `repo`. Loads already running are left alone;
    /// whichever finishes last decides the final track list.
    pub fn refresh(&mut self, repo: &TrackRepository) {
        self.start_refresh();
        self.in_flight.push(repo.spawn_load());
        tracing::debug!(in_flight = self.in_flight.len(), "refresh started");
    }

    /// Apply the outcome of every load that has finished since the last call.
    /// Returns how many loads completed.
    pub fn poll_loads(&mut self) -> usize {
        let mut finished = Vec::new();
        for load in self.in_flight.iter_mut() {
            if let Some(result) = load.try_complete() {
                finished.push(result);
            }
        }
        self.in_flight.retain(|l| !l.is_done());

        let count = finished.len();
        for result in finished {
            match result {
                Ok(tracks) => {
                    tracing::info!(tracks = tracks.len(), "library loaded");
                    self.refresh_succeeded(tracks);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "library load failed");
                    self.refresh_failed(load_error_message(&e));
                }
            }
        }
        count
    }

    #[cfg(test)]
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }
}

fn load_error_message(err: &LoadError) -> String {
    if let LoadError::PermissionDenied(_) = err {
        return PERMISSION_DENIED_MESSAGE.to_string();
    }
    let text = err.to_string();
    if text.trim().is_empty() {
        "Unknown error".to_string()
    } else {
        text
    }
}
