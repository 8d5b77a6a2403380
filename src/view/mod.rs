use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::app::AppState;

pub mod components;

use components::{
    compose_height, render_compose, render_confirm_popup, render_footer, render_header, render_thread_list,
    render_transcript,
};

/// Width of the thread list column
const THREAD_LIST_WIDTH: u16 = 32;

/// Main view: header, thread list beside the transcript, compose box, footer.
/// Overlays the confirmation popup when one is pending.
pub fn render(state: &AppState, frame: &mut Frame) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(5),    // Threads + transcript
            Constraint::Length(compose_height(state)),
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(THREAD_LIST_WIDTH), Constraint::Min(20)])
        .split(rows[1]);

    render_header(frame, rows[0], state);
    render_thread_list(frame, columns[0], state);
    render_transcript(frame, columns[1], state);
    render_compose(frame, rows[2], state);
    render_footer(frame, rows[3], state);

    render_confirm_popup(frame, state);
}
