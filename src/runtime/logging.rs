use std::fs::{self, File};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use crate::config::{LogSettings, default_log_path};

/// Install the global subscriber. Output goes to a file since stdout belongs
/// to the terminal UI; if no file can be opened, events are discarded.
pub fn init(settings: &LogSettings) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.filter))
        .unwrap_or_else(|_| EnvFilter::new("encore=info"));

    let file = settings
        .file
        .clone()
        .or_else(default_log_path)
        .and_then(|path| {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).ok()?;
            }
            File::options().create(true).append(true).open(path).ok()
        });

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_target(true);

    // A subscriber may already be installed; keep it.
    let registry = tracing_subscriber::registry().with(env_filter);
    let _ = match file {
        Some(file) => registry
            .with(fmt_layer.with_writer(Mutex::new(file)))
            .try_init(),
        None => registry
            .with(fmt_layer.with_writer(std::io::sink))
            .try_init(),
    };
}
