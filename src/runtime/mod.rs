use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{DisableFocusChange, EnableFocusChange};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::{AudioPlayer, PlaybackEngine, UnavailableEngine};
use crate::library::{DirectoryIndex, TrackRepository};

mod event_loop;
mod logging;
mod settings;

/// Command line arguments.
#[derive(clap::Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Music directory to browse (overrides `library.root`)
    pub dir: Option<PathBuf>,
}

pub fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let (settings, fallback) = settings::load_settings();
    logging::init(&settings.log);
    if let Some(reason) = fallback {
        tracing::warn!(%reason, "using default settings");
    }

    let root = cli
        .dir
        .or_else(|| settings.library.root.clone())
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("Music"));
    tracing::info!(root = %root.display(), "starting");

    let index = DirectoryIndex::new(root, settings.library.clone());
    let repo = TrackRepository::new(Arc::new(index));

    let engine: Box<dyn PlaybackEngine> = match AudioPlayer::new() {
        Ok(player) => Box::new(player),
        Err(e) => {
            tracing::error!(error = %e, "audio output unavailable");
            Box::new(UnavailableEngine::new(e))
        }
    };

    let mut app = App::new(repo, engine, Duration::from_millis(settings.ui.notice_ms));
    app.request_content();

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableFocusChange)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(&mut terminal, &settings, &mut app);

    app.shutdown();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableFocusChange, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("exiting");
    run_result
}
