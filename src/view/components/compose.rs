use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthChar;

use crate::app::{AppState, InputMode};
use crate::model::Theme;

/// Tallest the input box grows before scrolling.
pub const MAX_COMPOSE_LINES: usize = 5;

/// Rows the compose box needs, borders included.
pub fn compose_height(state: &AppState) -> u16 {
    let lines = state.ui.compose.lines().len().clamp(1, MAX_COMPOSE_LINES);
    lines as u16 + 2
}

/// Render the message input box.
/// Places the terminal cursor at the edit position while composing.
pub fn render_compose(frame: &mut Frame, area: Rect, state: &AppState) {
    let composing = state.ui.mode == InputMode::Compose;
    let width = area.width.saturating_sub(2) as usize;
    let height = area.height.saturating_sub(2) as usize;
    let view = build_compose_view(state, width, height);

    let title = match (composing, state.is_awaiting_response()) {
        (true, true) => "Message (waiting for reply, Ctrl+S: stop)",
        (true, false) => "Message (Enter: send, Alt+Enter: newline, Esc: cancel)",
        (false, _) => "Message",
    };

    let compose = Paragraph::new(view.lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if composing {
                Theme::ACTIVE_BORDER
            } else {
                Theme::PANEL_BORDER
            }))
            .title(title),
    );

    frame.render_widget(compose, area);

    if composing {
        let (x, y) = view.cursor;
        frame.set_cursor_position((area.x + 1 + x as u16, area.y + 1 + y as u16));
    }
}

struct ComposeView {
    lines: Vec<Line<'static>>,
    /// Cursor column and row inside the box
    cursor: (usize, usize),
}

/// Pure function: the window of the buffer that keeps the cursor visible in
/// a `width` x `height` box, or a placeholder.
fn build_compose_view(state: &AppState, width: usize, height: usize) -> ComposeView {
    let buffer = &state.ui.compose;
    if buffer.is_empty() && state.ui.mode != InputMode::Compose {
        return ComposeView {
            lines: vec![Line::from(Span::styled(
                "Press i to type a message",
                Style::default().fg(Theme::MUTED_TEXT),
            ))],
            cursor: (0, 0),
        };
    }

    let (row, _) = buffer.cursor_line_col();
    let col = buffer.cursor_display_col();
    let first = row.saturating_sub(height.max(1) - 1);
    let hscroll = col.saturating_sub(width.max(1) - 1);

    let lines = buffer
        .lines()
        .into_iter()
        .skip(first)
        .take(height.max(1))
        .map(|line| {
            Line::from(Span::styled(
                skip_columns(line, hscroll),
                Style::default().fg(Theme::TEXT),
            ))
        })
        .collect();

    ComposeView {
        lines,
        cursor: (col - hscroll, row - first),
    }
}

/// Drop the first `cols` display columns of `line`.
fn skip_columns(line: &str, cols: usize) -> String {
    let mut skipped = 0;
    line.chars()
        .skip_while(|c| {
            if skipped >= cols {
                return false;
            }
            skipped += c.width().unwrap_or(0);
            true
        })
        .collect()
}
