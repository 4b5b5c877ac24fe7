use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::error::PlaybackError;

use super::engine::{MediaItem, PlaybackEngine};
use super::sink::open_source;
use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, PlaybackHandle, PlaybackInfo, PlayerEvent};

/// `rodio`-backed [`PlaybackEngine`]. The output stream lives on a dedicated
/// thread; this handle only sends commands and reads shared state.
pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    events: Receiver<PlayerEvent>,
    playback: PlaybackHandle,
    item: Option<MediaItem>,
    join: Option<JoinHandle<()>>,
}

impl AudioPlayer {
    /// Open the default output device.
    pub fn new() -> Result<Self, PlaybackError> {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (events_tx, events) = mpsc::channel::<PlayerEvent>();
        let (ready_tx, ready_rx) = mpsc::sync_channel(1);
        let playback: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo::default()));

        let join = spawn_audio_thread(rx, events_tx, playback.clone(), ready_tx)
            .map_err(|e| PlaybackError::AudioInit(e.to_string()))?;

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(Self {
                tx,
                events,
                playback,
                item: None,
                join: Some(join),
            }),
            Ok(Err(e)) => {
                let _ = join.join();
                Err(e)
            }
            Err(_) => Err(PlaybackError::ChannelClosed),
        }
    }

    fn send(&self, cmd: AudioCmd) {
        if self.tx.send(cmd).is_err() {
            tracing::warn!("audio thread is gone; command dropped");
        }
    }
}

impl PlaybackEngine for AudioPlayer {
    fn set_media_item(&mut self, item: MediaItem) -> Result<(), PlaybackError> {
        let source = open_source(&item.locator)?;
        self.tx
            .send(AudioCmd::Load {
                source,
                media_id: item.media_id.clone(),
            })
            .map_err(|_| PlaybackError::ChannelClosed)?;

        tracing::info!(
            media_id = %item.media_id,
            title = %item.title,
            artist = %item.artist,
            album = %item.album,
            "media item set"
        );
        self.item = Some(item);
        Ok(())
    }

    fn prepare(&mut self) {
        self.send(AudioCmd::Prepare);
    }

    fn play(&mut self) {
        self.send(AudioCmd::Play);
    }

    fn pause(&mut self) {
        self.send(AudioCmd::Pause);
    }

    fn stop(&mut self) {
        self.send(AudioCmd::Stop);
    }

    fn clear_media_items(&mut self) {
        self.item = None;
        self.send(AudioCmd::Clear);
    }

    fn is_playing(&self) -> bool {
        self.playback.lock().map(|i| i.playing).unwrap_or(false)
    }

    fn media_item_count(&self) -> usize {
        usize::from(self.item.is_some())
    }

    fn elapsed(&self) -> Duration {
        self.playback
            .lock()
            .map(|i| i.elapsed)
            .unwrap_or(Duration::ZERO)
    }

    fn poll_events(&mut self) -> Vec<PlayerEvent> {
        self.events.try_iter().collect()
    }

    fn release(&mut self) {
        let Some(join) = self.join.take() else {
            return;
        };
        let _ = self.tx.send(AudioCmd::Quit);
        if join.join().is_err() {
            tracing::warn!("audio thread panicked during shutdown");
        }
        self.item = None;
    }
}

impl Drop for AudioPlayer {
    fn drop(&mut self) {
        self.release();
    }
}
