//! Opening and decoding files into sources, and wrapping sources in
//! paused `rodio` sinks.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rodio::{Decoder, OutputStream, Sink};

use crate::error::PlaybackError;

use super::types::AudioSource;

/// Open and decode the file at `path`.
pub(super) fn open_source(path: &Path) -> Result<AudioSource, PlaybackError> {
    let file = File::open(path).map_err(|e| PlaybackError::Open {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Decoder::new(BufReader::new(file)).map_err(|e| PlaybackError::Decode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Create a paused `Sink` playing `source`.
pub(super) fn create_sink(handle: &OutputStream, source: AudioSource) -> Sink {
    let sink = Sink::connect_new(handle.mixer());
    sink.append(source);
    sink.pause();
    sink
}
