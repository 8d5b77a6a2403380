use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{AppState, InputMode};
use crate::model::Theme;

/// Render footer status bar.
/// Shows the latest error if any, otherwise keybinding hints for the mode.
pub fn render_footer(frame: &mut Frame, area: Rect, state: &AppState) {
    let footer_text = build_footer_text(state);

    let footer = Paragraph::new(footer_text).style(
        Style::default()
            .fg(Theme::TEXT)
            .bg(Theme::FOOTER_BG)
            .add_modifier(Modifier::DIM),
    );

    frame.render_widget(footer, area);
}

/// Pure function: build footer text based on mode, notice and errors.
fn build_footer_text(state: &AppState) -> Line<'static> {
    if let Some(notice) = &state.meta.notice {
        return Line::from(Span::styled(
            notice.clone(),
            Style::default().fg(Theme::INFO),
        ));
    }

    if let Some(error) = state.latest_error() {
        return Line::from(vec![
            Span::styled("error: ", Style::default().fg(Theme::ERROR)),
            Span::raw(error.to_string()),
        ]);
    }

    let busy = state.is_awaiting_response();
    let hints: &[(&str, &str)] = match state.ui.mode {
        InputMode::Compose if busy => &[("Ctrl+S", "stop"), ("Esc", "cancel")],
        InputMode::Compose => &[("Enter", "send"), ("Alt+Enter", "newline"), ("Esc", "cancel")],
        InputMode::Confirm(_) => &[("y", "confirm"), ("n", "cancel")],
        InputMode::Normal => &[
            ("q", "quit"),
            ("i", "compose"),
            ("n", "new"),
            ("d", "delete"),
            ("Tab", "focus"),
            ("j/k", "scroll"),
            ("[/]", "tool"),
            ("e", "expand"),
            ("y", "copy"),
            ("Space", "auto-scroll"),
            ("r", "refresh"),
        ],
    };

    let stop: &[(&str, &str)] = if busy && state.ui.mode == InputMode::Normal {
        &[("s", "stop")]
    } else {
        &[]
    };
    let hints: Vec<&(&str, &str)> = stop.iter().chain(hints).collect();

    let mut spans = Vec::new();
    for (i, (key, action)) in hints.iter().enumerate() {
        spans.push(Span::styled(key.to_string(), Style::default().fg(Theme::INFO)));
        let sep = if i + 1 < hints.len() { " " } else { "" };
        spans.push(Span::raw(format!(":{}{}", action, sep)));
    }

    Line::from(spans)
}
