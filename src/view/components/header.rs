use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{AppState, InputMode};
use crate::model::Theme;

/// Render header bar.
/// Shows: app name, current thread label and title, thread count, busy
/// indicator, input mode.
pub fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let header_text = build_header_text(state);

    let header = Paragraph::new(header_text).style(
        Style::default()
            .fg(Theme::TEXT)
            .bg(Theme::HEADER_BG)
            .add_modifier(Modifier::BOLD),
    );

    frame.render_widget(header, area);
}

/// Pure function: build header text from state.
fn build_header_text(state: &AppState) -> Line<'static> {
    let mut spans = vec![Span::styled(
        "thread-lens",
        Style::default().fg(Theme::ACCENT),
    )];

    let entries = state.thread_entries();
    let count = entries.len();

    spans.push(Span::raw(" "));
    match entries.into_iter().find(|entry| entry.is_current) {
        Some(entry) => {
            spans.push(Span::styled(
                format!("[{}]", entry.label),
                Style::default().fg(Theme::INFO),
            ));
            if let Some(title) = entry.title {
                spans.push(Span::raw(" "));
                spans.push(Span::styled(title, Style::default().fg(Theme::TEXT)));
            }
        }
        None => spans.push(Span::styled(
            "[no thread]",
            Style::default().fg(Theme::MUTED_TEXT),
        )),
    }

    spans.push(Span::styled(
        format!(" ({} {})", count, if count == 1 { "thread" } else { "threads" }),
        Style::default().fg(Theme::MUTED_TEXT),
    ));

    if let Some(busy) = busy_indicator(state) {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(busy, Style::default().fg(Theme::ACCENT_WARM)));
    }

    let mode = match state.ui.mode {
        InputMode::Normal => None,
        InputMode::Compose => Some("COMPOSE"),
        InputMode::Confirm(_) => Some("CONFIRM"),
    };
    if let Some(mode) = mode {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            format!("-- {} --", mode),
            Style::default().fg(Theme::ACCENT_WARM),
        ));
    }

    Line::from(spans)
}

/// Pulsing marker while the agent owes a response; the dot alternates with
/// each second of tick time.
fn busy_indicator(state: &AppState) -> Option<String> {
    if !state.is_awaiting_response() {
        return None;
    }
    let dot = match state.meta.last_tick {
        Some(tick) if tick.timestamp() % 2 == 1 => "○",
        _ => "●",
    };
    let label = if state.domain.stop_requested {
        "stopping"
    } else {
        "working"
    };
    Some(format!("{} {}", dot, label))
}
