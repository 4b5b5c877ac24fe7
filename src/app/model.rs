//! The presentation model: owns the store, the repository and the playback
//! engine, turns user intents into store transitions and engine calls, and
//! derives a [`ViewModel`] from the latest snapshot.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use crate::audio::{MediaItem, PlaybackEngine, PlaybackStatus, PlayerEvent};
use crate::error::LoadError;
use crate::library::{Track, TrackRepository, diff_tracks, position_of};
use crate::store::{PERMISSION_DENIED_MESSAGE, StateStore, SubscriptionId, UiState};

use super::view::ViewModel;

pub const PLAYBACK_ERROR_MESSAGE: &str = "Unable to play this track";

/// A transient message shown for a fixed time.
#[derive(Debug, Clone)]
struct Notice {
    text: String,
    shown_at: Instant,
}

pub struct App {
    store: StateStore,
    repo: TrackRepository,
    engine: Box<dyn PlaybackEngine>,

    snapshots: Receiver<Arc<UiState>>,
    subscription: Option<SubscriptionId>,
    /// Last snapshot delivered by the store.
    state: Arc<UiState>,

    /// Cursor position in the track list.
    pub selected: usize,
    notice: Option<Notice>,
    notice_ttl: Duration,
}

impl App {
    pub fn new(
        repo: TrackRepository,
        engine: Box<dyn PlaybackEngine>,
        notice_ttl: Duration,
    ) -> Self {
        let mut store = StateStore::new();
        let (tx, snapshots) = mpsc::channel();
        let subscription = store.subscribe(move |s| {
            let _ = tx.send(s.clone());
        });
        let state = store.current();

        let mut app = Self {
            store,
            repo,
            engine,
            snapshots,
            subscription: Some(subscription),
            state,
            selected: 0,
            notice: None,
            notice_ttl,
        };
        app.drain_snapshots();
        app
    }

    /// The snapshot the view is currently derived from.
    #[cfg(test)]
    pub fn state(&self) -> &Arc<UiState> {
        &self.state
    }

    #[cfg(test)]
    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_ref().map(|n| n.text.as_str())
    }

    pub fn view(&self) -> ViewModel {
        ViewModel::derive(
            &self.state,
            self.selected,
            self.engine.elapsed(),
            self.notice(),
        )
    }

    fn show_notice(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice {
            text: text.into(),
            shown_at: Instant::now(),
        });
    }

    /// Check read access, then reload the library.
    pub fn request_content(&mut self) {
        if self.state.is_loading {
            return;
        }
        match self.repo.check_access() {
            Ok(()) => self.store.refresh(&self.repo),
            Err(LoadError::PermissionDenied(path)) => {
                tracing::warn!(path = %path.display(), "library is not readable");
                self.show_notice(PERMISSION_DENIED_MESSAGE);
            }
            Err(e) => {
                self.store.start_refresh();
                self.store.refresh_failed(e.to_string());
            }
        }
        self.drain_snapshots();
    }

    /// Play the track under the cursor.
    pub fn select_at_cursor(&mut self) {
        let Some(track) = self.state.tracks.get(self.selected).cloned() else {
            return;
        };
        self.select_track(track);
    }

    pub fn select_track(&mut self, track: Track) {
        match self.engine.set_media_item(MediaItem::from(&track)) {
            Ok(()) => {
                self.engine.prepare();
                self.engine.play();
                tracing::info!(id = %track.id, title = %track.title, "playback started");
                self.store.set_now_playing(Some(track));
            }
            Err(e) => {
                tracing::warn!(error = %e, id = %track.id, "playback failed");
                self.show_notice(PLAYBACK_ERROR_MESSAGE);
            }
        }
        self.drain_snapshots();
    }

    pub fn toggle_playback(&mut self) {
        if !self.state.has_selection() {
            return;
        }
        if self.engine.is_playing() {
            self.engine.pause();
        } else if self.engine.media_item_count() > 0 {
            self.engine.play();
        }
    }

    pub fn stop_playback(&mut self) {
        if !self.state.has_selection() {
            return;
        }
        self.engine.stop();
        self.engine.clear_media_items();
        self.store.set_now_playing(None);
        self.store.set_is_playing(false);
        tracing::info!("playback stopped");
        self.drain_snapshots();
    }

    pub fn on_player_event(&mut self, event: PlayerEvent) {
        match event {
            PlayerEvent::IsPlayingChanged(playing) => self.store.set_is_playing(playing),
            PlayerEvent::PlaybackStateChanged(PlaybackStatus::Ended) => {
                self.store.set_is_playing(false);
            }
            PlayerEvent::PlaybackStateChanged(_) => {}
        }
        self.drain_snapshots();
    }

    /// The screen went to the background: pause and reflect it.
    pub fn on_background(&mut self) {
        self.engine.pause();
        self.store.set_is_playing(false);
        self.drain_snapshots();
    }

    /// Apply finished loads and engine events, then catch the view up.
    pub fn tick(&mut self) {
        self.store.poll_loads();
        self.drain_snapshots();
        for event in self.engine.poll_events() {
            self.on_player_event(event);
        }

        if let Some(notice) = &self.notice {
            if notice.shown_at.elapsed() >= self.notice_ttl {
                self.notice = None;
            }
        }
    }

    fn drain_snapshots(&mut self) {
        while let Ok(snapshot) = self.snapshots.try_recv() {
            self.apply_snapshot(snapshot);
        }
    }

    fn apply_snapshot(&mut self, snapshot: Arc<UiState>) {
        if !Arc::ptr_eq(&self.state.tracks, &snapshot.tracks) {
            self.follow_cursor(&snapshot);
        }
        let message = snapshot.error_message.clone();
        self.state = snapshot;

        // Show an error once, then clear it so later snapshots don't repeat it.
        if let Some(message) = message {
            self.show_notice(message);
            self.store.clear_error();
        }
    }

    /// Keep the cursor on the same track when the list is replaced.
    fn follow_cursor(&mut self, next: &UiState) {
        let diff = diff_tracks(&self.state.tracks, &next.tracks);
        if !diff.is_empty() {
            tracing::debug!(
                inserted = diff.inserted.len(),
                removed = diff.removed.len(),
                changed = diff.changed.len(),
                "track list changed"
            );
        }

        let under_cursor = self.state.tracks.get(self.selected).map(|t| t.id);
        self.selected = under_cursor
            .and_then(|id| position_of(&next.tracks, id))
            .unwrap_or_else(|| self.selected.min(next.tracks.len().saturating_sub(1)));
    }

    pub fn next(&mut self) {
        let len = self.state.tracks.len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    pub fn prev(&mut self) {
        let len = self.state.tracks.len();
        if len > 0 {
            self.selected = (self.selected + len - 1) % len;
        }
    }

    pub fn first(&mut self) {
        self.selected = 0;
    }

    pub fn last(&mut self) {
        self.selected = self.state.tracks.len().saturating_sub(1);
    }

    /// Drop the store subscription and free the engine.
    pub fn shutdown(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.store.unsubscribe(id);
        }
        self.engine.release();
    }
}
