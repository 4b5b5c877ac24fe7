use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, SyncSender};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStreamBuilder, Sink};

use crate::error::PlaybackError;

use super::sink::create_sink;
use super::types::{AudioCmd, PlaybackHandle, PlaybackStatus, PlayerEvent};

const TICK: Duration = Duration::from_millis(100);

/// Transport state owned by the audio thread.
struct Transport {
    sink: Option<Sink>,
    paused: bool,
    // Start time of the current playing stretch and time accumulated before it.
    started_at: Option<Instant>,
    accumulated: Duration,
    status: PlaybackStatus,
    events: Sender<PlayerEvent>,
    info: PlaybackHandle,
}

impl Transport {
    fn elapsed(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed())
    }

    fn emit(&self, event: PlayerEvent) {
        let _ = self.events.send(event);
    }

    fn set_status(&mut self, status: PlaybackStatus) {
        if self.status != status {
            self.status = status;
            self.emit(PlayerEvent::PlaybackStateChanged(status));
        }
    }

    fn set_playing(&mut self, playing: bool) {
        let was_playing = !self.paused;
        if playing {
            self.started_at = Some(Instant::now());
        } else if let Some(st) = self.started_at.take() {
            self.accumulated += st.elapsed();
        }
        self.paused = !playing;
        if was_playing != playing {
            self.emit(PlayerEvent::IsPlayingChanged(playing));
        }
    }

    fn load(&mut self, sink: Sink) {
        if let Some(old) = self.sink.take() {
            old.stop();
        }
        self.set_playing(false);
        self.sink = Some(sink);
        self.started_at = None;
        self.accumulated = Duration::ZERO;
        self.set_status(PlaybackStatus::Ready);
    }

    fn play(&mut self) {
        let Some(sink) = self.sink.as_ref() else {
            return;
        };
        if self.paused {
            sink.play();
            self.set_playing(true);
        }
    }

    fn pause(&mut self) {
        let Some(sink) = self.sink.as_ref() else {
            return;
        };
        if !self.paused {
            sink.pause();
            self.set_playing(false);
        }
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.set_playing(false);
        self.started_at = None;
        self.accumulated = Duration::ZERO;
        self.set_status(PlaybackStatus::Idle);
    }

    /// Detect the natural end of the current item.
    fn check_ended(&mut self) {
        let ended = matches!(self.sink.as_ref(), Some(s) if !self.paused && s.empty());
        if ended {
            self.sink = None;
            self.set_playing(false);
            self.set_status(PlaybackStatus::Ended);
        }
    }

    fn publish(&self) {
        if let Ok(mut info) = self.info.lock() {
            info.elapsed = self.elapsed();
            info.playing = !self.paused;
        }
    }
}

/// Spawn the thread that owns the output stream.
///
/// `ready` receives `Ok(())` once the output device is open, or the error
/// that prevented it; in the latter case the thread has already exited.
pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    events: Sender<PlayerEvent>,
    info: PlaybackHandle,
    ready: SyncSender<Result<(), PlaybackError>>,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("encore-audio".into())
        .spawn(move || {
            let mut stream = match OutputStreamBuilder::open_default_stream() {
                Ok(stream) => stream,
                Err(e) => {
                    let _ = ready.send(Err(PlaybackError::AudioInit(e.to_string())));
                    return;
                }
            };
            // rodio logs to stderr when OutputStream is dropped, which would
            // draw over the TUI.
            stream.log_on_drop(false);
            let _ = ready.send(Ok(()));

            let mut transport = Transport {
                sink: None,
                paused: true,
                started_at: None,
                accumulated: Duration::ZERO,
                status: PlaybackStatus::Idle,
                events,
                info,
            };

            loop {
                match rx.recv_timeout(TICK) {
                    Ok(AudioCmd::Load { source, media_id }) => {
                        transport.load(create_sink(&stream, source));
                        tracing::debug!(%media_id, "item loaded");
                    }
                    Ok(AudioCmd::Prepare) => {
                        if transport.sink.is_some() {
                            transport.set_status(PlaybackStatus::Ready);
                        }
                    }
                    Ok(AudioCmd::Play) => transport.play(),
                    Ok(AudioCmd::Pause) => transport.pause(),
                    Ok(AudioCmd::Stop | AudioCmd::Clear) => transport.stop(),
                    Ok(AudioCmd::Quit) => {
                        transport.stop();
                        transport.publish();
                        break;
                    }
                    Err(RecvTimeoutError::Timeout) => {}
                    Err(RecvTimeoutError::Disconnected) => break,
                }

                transport.check_ended();
                transport.publish();
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::types::PlaybackInfo;
    use rodio::Source;
    use rodio::source::SineWave;
    use std::sync::mpsc::{self, Receiver};
    use std::sync::{Arc, Mutex};

    fn transport() -> (Transport, Receiver<PlayerEvent>) {
        let (events, rx) = mpsc::channel();
        let transport = Transport {
            sink: None,
            paused: true,
            started_at: None,
            accumulated: Duration::ZERO,
            status: PlaybackStatus::Idle,
            events,
            info: Arc::new(Mutex::new(PlaybackInfo::default())),
        };
        (transport, rx)
    }

    /// A sink with no output device, fed a short tone. The queue output is
    /// what a device would pull samples from.
    fn short_tone() -> (Sink, rodio::queue::SourcesQueueOutput) {
        let (sink, output) = Sink::new();
        sink.append(SineWave::new(440.0).take_duration(Duration::from_millis(20)));
        sink.pause();
        (sink, output)
    }

    #[test]
    fn natural_end_reports_not_playing_then_ended() {
        let (mut t, events) = transport();
        let (sink, mut output) = short_tone();

        t.load(sink);
        t.play();
        t.check_ended();
        assert!(!t.paused, "still playing before the source is drained");

        // One second of samples is far more than the 20 ms tone.
        for _ in output.by_ref().take(48_000) {}
        t.check_ended();

        let seen: Vec<PlayerEvent> = events.try_iter().collect();
        assert_eq!(
            seen,
            vec![
                PlayerEvent::PlaybackStateChanged(PlaybackStatus::Ready),
                PlayerEvent::IsPlayingChanged(true),
                PlayerEvent::IsPlayingChanged(false),
                PlayerEvent::PlaybackStateChanged(PlaybackStatus::Ended),
            ]
        );
        assert!(t.sink.is_none());
    }

    #[test]
    fn pause_and_stop_emit_transitions_once() {
        let (mut t, events) = transport();
        let (sink, _output) = short_tone();

        t.load(sink);
        t.play();
        t.play();
        t.pause();
        t.pause();
        t.stop();

        let seen: Vec<PlayerEvent> = events.try_iter().collect();
        assert_eq!(
            seen,
            vec![
                PlayerEvent::PlaybackStateChanged(PlaybackStatus::Ready),
                PlayerEvent::IsPlayingChanged(true),
                PlayerEvent::IsPlayingChanged(false),
                PlayerEvent::PlaybackStateChanged(PlaybackStatus::Idle),
            ]
        );
        assert_eq!(t.elapsed(), Duration::ZERO);
    }

    #[test]
    fn transport_without_item_ignores_play() {
        let (mut t, events) = transport();
        t.play();
        t.pause();
        assert!(events.try_iter().next().is_none());
        assert!(t.paused);
    }

    #[test]
    fn elapsed_accumulates_only_while_playing() {
        let (mut t, _events) = transport();
        let (sink, _output) = short_tone();
        t.load(sink);

        t.play();
        std::thread::sleep(Duration::from_millis(15));
        t.pause();
        let paused_at = t.elapsed();
        assert!(paused_at >= Duration::from_millis(15));

        std::thread::sleep(Duration::from_millis(15));
        assert_eq!(t.elapsed(), paused_at);

        t.publish();
        let info = t.info.lock().unwrap();
        assert_eq!(info.elapsed, paused_at);
        assert!(!info.playing);
    }
}
