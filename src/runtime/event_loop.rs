use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::config;
use crate::ui;

const POLL: Duration = Duration::from_millis(50);

/// State tracked by the event loop across iterations.
#[derive(Debug, Default)]
struct EventLoopState {
    /// Two-key prefix state used for `gg` handling.
    pending_gg: bool,
}

/// Main terminal event loop. Returns `Ok(())` when the user quits.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut state = EventLoopState::default();

    loop {
        app.tick();

        let view = app.view();
        terminal.draw(|f| ui::draw(f, &view, &settings.ui))?;

        if !event::poll(POLL)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, app, &mut state) {
                    return Ok(());
                }
            }
            Event::FocusLost => {
                if settings.ui.pause_on_focus_lost {
                    tracing::debug!("focus lost; pausing");
                    app.on_background();
                }
            }
            // A resize only changes the layout; the next draw picks it up.
            _ => {}
        }
    }
}

/// Returns `true` when the app should exit.
fn handle_key_event(key: KeyEvent, app: &mut App, state: &mut EventLoopState) -> bool {
    let pending_gg = std::mem::take(&mut state.pending_gg);

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.prev(),
        KeyCode::Char('g') => {
            if pending_gg {
                app.first();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => app.last(),
        KeyCode::Enter => app.select_at_cursor(),
        KeyCode::Char(' ') | KeyCode::Char('p') => app.toggle_playback(),
        KeyCode::Char('s') => app.stop_playback(),
        KeyCode::Char('r') => app.request_content(),
        _ => {}
    }
    false
}
