//! UI rendering helpers for the terminal user interface.
//!
//! Everything drawn here comes from a [`ViewModel`]; this module never looks
//! at the store or the engine directly.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::app::{Row, ViewModel};
use crate::config::UiSettings;

/// A footer entry: key, description and whether it is currently usable.
struct Control {
    keys: &'static str,
    label: &'static str,
    enabled: bool,
}

impl Control {
    fn new(keys: &'static str, label: &'static str, enabled: bool) -> Self {
        Self {
            keys,
            label,
            enabled,
        }
    }
}

fn controls(view: &ViewModel) -> Vec<Control> {
    let has_rows = !view.rows.is_empty();
    let transport = view.transport_enabled;
    vec![
        Control::new("j/k", "up/down", has_rows),
        Control::new("gg/G", "top/bottom", has_rows),
        Control::new("enter", "play selected", has_rows),
        Control::new("space/p", view.play_pause_label, transport),
        Control::new("s", "stop", transport),
        Control::new("r", "refresh", view.refresh_enabled),
        Control::new("q", "quit", true),
    ]
}

fn controls_line(view: &ViewModel) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, c) in controls(view).into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" | "));
        }
        let span = Span::raw(format!("[{}] {}", c.keys, c.label));
        spans.push(if c.enabled {
            span
        } else {
            span.add_modifier(Modifier::DIM)
        });
    }
    Line::from(spans)
}

fn left_pad() -> Padding {
    Padding {
        left: 1,
        right: 0,
        top: 0,
        bottom: 0,
    }
}

/// Window of `total` rows of height `height` that keeps `cursor` centred
/// when possible. Returns `(start, end, cursor_in_window)`.
fn visible_window(total: usize, height: usize, cursor: usize) -> (usize, usize, usize) {
    let cursor = cursor.min(total.saturating_sub(1));
    if total <= height || height == 0 {
        return (0, total, cursor);
    }
    let half = height / 2;
    let mut start = cursor.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height, cursor - start)
}

fn row_item(row: &Row, width: u16) -> ListItem<'static> {
    let marker = if row.is_now_playing { "♪ " } else { "  " };
    let left = format!("{marker}{} · {}", row.title, row.subtitle);
    // Right-align the duration inside the list borders and highlight symbol.
    let room = (width as usize).saturating_sub(4);
    let pad = room.saturating_sub(left.chars().count() + row.duration.chars().count());
    let text = format!("{left}{}{}", " ".repeat(pad.max(1)), row.duration);
    let item = ListItem::new(text);
    if row.is_now_playing {
        item.bold()
    } else {
        item
    }
}

fn draw_now_playing(frame: &mut Frame, view: &ViewModel, area: Rect) {
    let state = match (view.transport_enabled, view.play_pause_label) {
        (false, _) => "Stopped",
        (true, "Pause") => "Playing",
        (true, _) => "Paused",
    };
    let mut lines = vec![Line::from(Span::raw(view.now_playing_title.clone()).bold())];
    if !view.now_playing_subtitle.is_empty() {
        lines.push(Line::from(view.now_playing_subtitle.clone()));
    }
    match &view.elapsed {
        Some(elapsed) => lines.push(Line::from(format!("{state} • {elapsed}"))),
        None => lines.push(Line::from(state).dim()),
    }

    let par = Paragraph::new(lines)
        .block(Block::bordered().padding(left_pad()).title(" now playing "))
        .wrap(Wrap { trim: true });
    frame.render_widget(par, area);
}

fn draw_tracks(frame: &mut Frame, view: &ViewModel, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" tracks ");

    if view.show_loading && view.rows.is_empty() {
        let par = Paragraph::new("Loading…")
            .alignment(Alignment::Center)
            .slow_blink()
            .block(block);
        frame.render_widget(par, area);
        return;
    }
    if view.show_empty {
        let par = Paragraph::new("No music found")
            .alignment(Alignment::Center)
            .dim()
            .block(block);
        frame.render_widget(par, area);
        return;
    }

    let block = if view.show_loading {
        block.title_bottom(Line::from(" refreshing… ").right_aligned())
    } else {
        block
    };

    // Only build items for the visible window.
    let height = area.height.saturating_sub(2) as usize;
    let (start, end, selected) = visible_window(view.rows.len(), height, view.cursor);
    let items: Vec<ListItem> = view.rows[start..end]
        .iter()
        .map(|row| row_item(row, area.width))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if end > start {
        state.select(Some(selected));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

/// Render the whole screen.
pub fn draw(frame: &mut Frame, view: &ViewModel, ui_settings: &UiSettings) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" encore ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    draw_now_playing(frame, view, chunks[1]);
    draw_tracks(frame, view, chunks[2]);

    if let Some(notice) = &view.notice {
        let par = Paragraph::new(format!(" {notice}")).reversed();
        frame.render_widget(par, chunks[3]);
    }

    let footer = Paragraph::new(controls_line(view))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(left_pad()),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{Terminal, backend::TestBackend};

    fn view(rows: usize) -> ViewModel {
        ViewModel {
            rows: (0..rows)
                .map(|i| Row {
                    title: format!("Song {i}"),
                    subtitle: "Artist • Album".into(),
                    duration: "3:00".into(),
                    is_now_playing: i == 1,
                })
                .collect(),
            cursor: 0,
            show_loading: false,
            show_empty: rows == 0,
            refresh_enabled: true,
            transport_enabled: false,
            play_pause_label: "Play",
            now_playing_title: crate::app::NO_TRACK_SELECTED.into(),
            now_playing_subtitle: String::new(),
            elapsed: None,
            notice: None,
        }
    }

    fn render(view: &ViewModel) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();
        terminal
            .draw(|f| draw(f, view, &UiSettings::default()))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn window_keeps_cursor_centred() {
        assert_eq!(visible_window(5, 10, 3), (0, 5, 3));
        assert_eq!(visible_window(100, 10, 50), (45, 55, 5));
        assert_eq!(visible_window(100, 10, 99), (90, 100, 9));
        assert_eq!(visible_window(0, 10, 0), (0, 0, 0));
    }

    #[test]
    fn disabled_controls_are_dimmed() {
        let line = controls_line(&view(0));
        let dimmed: Vec<String> = line
            .spans
            .iter()
            .filter(|s| s.style.add_modifier.contains(Modifier::DIM))
            .map(|s| s.content.to_string())
            .collect();
        assert!(dimmed.contains(&"[s] stop".to_string()));
        assert!(dimmed.contains(&"[space/p] Play".to_string()));
        assert!(!dimmed.contains(&"[r] refresh".to_string()));
    }

    #[test]
    fn empty_state_and_placeholder_title_are_drawn() {
        let screen = render(&view(0));
        assert!(screen.contains("No music found"));
        assert!(screen.contains("No track selected"));
    }

    #[test]
    fn rows_and_notice_are_drawn() {
        let mut v = view(3);
        v.notice = Some("Unable to play this track".into());
        let screen = render(&v);
        assert!(screen.contains("Song 2"));
        assert!(screen.contains("♪ Song 1"));
        assert!(screen.contains("Unable to play this track"));
    }
}
