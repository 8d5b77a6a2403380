use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

use crate::app::{AppState, PanelFocus};
use crate::model::Theme;

/// Max title characters shown next to a thread label
const TITLE_WIDTH: usize = 24;

/// Render the thread switcher panel.
/// Shows every known thread with the current one marked and the highlighted
/// row selected when the panel has focus.
pub fn render_thread_list(frame: &mut Frame, area: Rect, state: &AppState) {
    let items = build_thread_items(state);
    let is_focused = state.ui.focus == PanelFocus::Threads;

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if is_focused {
                Theme::ACTIVE_BORDER
            } else {
                Theme::PANEL_BORDER
            }))
            .title("Threads"),
    );

    frame.render_widget(list, area);
}

/// Pure function: build list items from the thread entries.
fn build_thread_items(state: &AppState) -> Vec<ListItem<'static>> {
    let entries = state.thread_entries();
    if entries.is_empty() {
        return vec![ListItem::new(Line::from(Span::styled(
            "No threads (n: new)",
            Style::default().fg(Theme::MUTED_TEXT),
        )))];
    }

    let highlighted = match state.ui.focus {
        PanelFocus::Threads => state.ui.selected_thread,
        PanelFocus::Transcript => None,
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(idx, entry)| {
            let (marker, marker_color) = if entry.is_current {
                ("●", Theme::ACCENT)
            } else {
                ("○", Theme::MUTED_TEXT)
            };

            let label_style = if entry.is_current {
                Style::default().fg(Theme::TEXT).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Theme::TEXT)
            };

            let mut spans = vec![
                Span::styled(format!("{} ", marker), Style::default().fg(marker_color)),
                Span::styled(entry.label, label_style),
            ];
            if let Some(title) = entry.title {
                spans.push(Span::styled(
                    format!(" {}", truncate(&title, TITLE_WIDTH)),
                    Style::default().fg(Theme::MUTED_TEXT),
                ));
            }

            let item = ListItem::new(Line::from(spans));
            if highlighted == Some(idx) {
                item.style(Style::default().bg(Theme::SELECTION_BG))
            } else {
                item
            }
        })
        .collect()
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}
