use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{AppState, InputMode};
use crate::model::Theme;

/// Render the confirmation dialog on top of the current view.
/// Does nothing unless a prompt is pending.
pub fn render_confirm_popup(frame: &mut Frame, state: &AppState) {
    let InputMode::Confirm(prompt) = &state.ui.mode else {
        return;
    };

    let area = centered_rect(50, 20, frame.area());
    frame.render_widget(Clear, area);

    let text = vec![
        Line::from(Span::styled(
            prompt.message(),
            Style::default().fg(Theme::TEXT),
        )),
        Line::default(),
        Line::from(vec![
            Span::styled("y", Style::default().fg(Theme::INFO).add_modifier(Modifier::BOLD)),
            Span::raw(": yes   "),
            Span::styled("n", Style::default().fg(Theme::INFO).add_modifier(Modifier::BOLD)),
            Span::raw(": no"),
        ]),
    ];

    let popup = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Theme::WARNING))
                .title(" Confirm "),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(popup, area);
}

/// Helper function to create a centered rectangle.
/// Used for popup overlays.
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use crate::app::ConfirmPrompt;

    fn rendered(state: &AppState) -> String {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render_confirm_popup(frame, state))
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
    fn centered_rect_is_inside_parent() {
        let parent = Rect::new(0, 0, 100, 50);
        let popup = centered_rect(50, 20, parent);
        assert_eq!(popup.width, 50);
        assert_eq!(popup.height, 10);
        assert_eq!(popup.x, 25);
        assert_eq!(popup.y, 20);
    }

    #[test]
    fn nothing_rendered_outside_confirm_mode() {
        assert!(!rendered(&AppState::new()).contains("Confirm"));
    }

    #[test]
    fn delete_prompt_is_rendered() {
        let mut state = AppState::new();
        state.ui.mode = InputMode::Confirm(ConfirmPrompt::DeleteThread("t1".into()));
        let screen = rendered(&state);
        assert!(screen.contains("Confirm"));
        assert!(screen.contains("Delete this conversation?"));
    }
}
