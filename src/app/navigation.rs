use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::update::{
    copy_message, create_thread, delete_thread, request_delete_thread, request_new_thread,
    request_stop, select_thread, submit_compose,
};
use crate::app::{AppState, ConfirmPrompt, InputMode, PanelFocus, ThreadAction};
use crate::model::ThreadId;
use crate::resolve::{build_render_plan, expandable_keys};

/// Half-page jump size for Ctrl+D / Ctrl+U
const PAGE_JUMP: usize = 10;

/// Keyboard state transition.
/// No I/O; store and transport work is queued as actions.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        state.meta.should_quit = true;
        return;
    }

    match state.ui.mode.clone() {
        InputMode::Confirm(prompt) => handle_confirm_key(state, prompt, key),
        InputMode::Compose => handle_compose_key(state, key),
        InputMode::Normal => handle_normal_key(state, key),
    }
}

fn handle_normal_key(state: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => state.meta.should_quit = true,
        KeyCode::Char('i') => state.ui.mode = InputMode::Compose,
        KeyCode::Char('n') => request_new_thread(state),
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => scroll_page_down(state),
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => scroll_page_up(state),
        KeyCode::Char('d') => {
            if let Some(id) = highlighted_or_current_thread(state) {
                request_delete_thread(state, id);
            }
        }
        KeyCode::Char('r') => state.request(ThreadAction::Refresh),
        KeyCode::Char('s') => request_stop(state),
        KeyCode::Char('y') => copy_message(state),
        KeyCode::Tab => toggle_focus(state),
        KeyCode::Char('j') | KeyCode::Down => move_down(state),
        KeyCode::Char('k') | KeyCode::Up => move_up(state),
        KeyCode::Char(']') => move_tool_cursor(state, true),
        KeyCode::Char('[') => move_tool_cursor(state, false),
        KeyCode::Char('e') => toggle_expansion(state),
        KeyCode::Enter => match state.ui.focus {
            PanelFocus::Threads => open_highlighted_thread(state),
            PanelFocus::Transcript => toggle_expansion(state),
        },
        KeyCode::Char('g') => {
            state.ui.transcript_scroll = 0;
            state.ui.auto_scroll = false;
        }
        KeyCode::Char('G') => state.ui.auto_scroll = true,
        KeyCode::Char(' ') => state.ui.auto_scroll = !state.ui.auto_scroll,
        _ => {}
    }
}

/// Enter sends; Shift+Enter or Alt+Enter starts a new line. Not every
/// terminal reports Shift+Enter, Alt+Enter is the portable binding.
fn handle_compose_key(state: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            state.ui.mode = InputMode::Normal;
        }
        KeyCode::Enter if key.modifiers.intersects(KeyModifiers::SHIFT | KeyModifiers::ALT) => {
            state.ui.compose.newline()
        }
        KeyCode::Enter => submit_compose(state),
        KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => request_stop(state),
        KeyCode::Backspace => state.ui.compose.backspace(),
        KeyCode::Delete => state.ui.compose.delete(),
        KeyCode::Left => state.ui.compose.move_left(),
        KeyCode::Right => state.ui.compose.move_right(),
        KeyCode::Home => state.ui.compose.move_home(),
        KeyCode::End => state.ui.compose.move_end(),
        KeyCode::Char(c) => state.ui.compose.insert(c),
        _ => {}
    }
}

fn handle_confirm_key(state: &mut AppState, prompt: ConfirmPrompt, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Enter => {
            state.ui.mode = InputMode::Normal;
            match prompt {
                ConfirmPrompt::NewThread => {
                    create_thread(state);
                }
                ConfirmPrompt::DeleteThread(id) => delete_thread(state, id),
            }
        }
        KeyCode::Char('n') | KeyCode::Esc => state.ui.mode = InputMode::Normal,
        _ => {}
    }
}

fn toggle_focus(state: &mut AppState) {
    state.ui.focus = match state.ui.focus {
        PanelFocus::Threads => PanelFocus::Transcript,
        PanelFocus::Transcript => PanelFocus::Threads,
    };
    if state.ui.focus == PanelFocus::Threads && state.ui.selected_thread.is_none() {
        let count = state.thread_entries().len();
        if count > 0 {
            state.ui.selected_thread = Some(0);
        }
    }
}

fn move_down(state: &mut AppState) {
    match state.ui.focus {
        PanelFocus::Threads => {
            let count = state.thread_entries().len();
            if count > 0 {
                let next = state.ui.selected_thread.map_or(0, |i| i + 1);
                state.ui.selected_thread = Some(next.min(count - 1));
            }
        }
        PanelFocus::Transcript => {
            state.ui.transcript_scroll = state.ui.transcript_scroll.saturating_add(1);
            state.ui.auto_scroll = false;
        }
    }
}

fn move_up(state: &mut AppState) {
    match state.ui.focus {
        PanelFocus::Threads => {
            if let Some(i) = state.ui.selected_thread {
                state.ui.selected_thread = Some(i.saturating_sub(1));
            }
        }
        PanelFocus::Transcript => {
            state.ui.transcript_scroll = state.ui.transcript_scroll.saturating_sub(1);
            state.ui.auto_scroll = false;
        }
    }
}

fn scroll_page_down(state: &mut AppState) {
    state.ui.transcript_scroll = state.ui.transcript_scroll.saturating_add(PAGE_JUMP);
    state.ui.auto_scroll = false;
}

fn scroll_page_up(state: &mut AppState) {
    state.ui.transcript_scroll = state.ui.transcript_scroll.saturating_sub(PAGE_JUMP);
    state.ui.auto_scroll = false;
}

fn highlighted_or_current_thread(state: &AppState) -> Option<ThreadId> {
    if state.ui.focus == PanelFocus::Threads {
        if let Some(entry) = state
            .ui
            .selected_thread
            .and_then(|i| state.thread_entries().into_iter().nth(i))
        {
            return Some(entry.thread_id);
        }
    }
    state.domain.current_thread.clone()
}

fn open_highlighted_thread(state: &mut AppState) {
    let Some(index) = state.ui.selected_thread else {
        return;
    };
    if let Some(entry) = state.thread_entries().into_iter().nth(index) {
        select_thread(state, entry.thread_id);
        state.ui.focus = PanelFocus::Transcript;
    }
}

fn move_tool_cursor(state: &mut AppState, forward: bool) {
    let events = state.display_events();
    let count = expandable_keys(&build_render_plan(&events)).len();
    if count == 0 {
        state.ui.tool_cursor = None;
        return;
    }

    state.ui.tool_cursor = Some(match (state.ui.tool_cursor, forward) {
        (None, true) => 0,
        (None, false) => count - 1,
        (Some(i), true) => (i + 1).min(count - 1),
        (Some(i), false) => i.saturating_sub(1),
    });
}

/// Toggle the tool output under the cursor (first one if none selected).
fn toggle_expansion(state: &mut AppState) {
    let events = state.display_events();
    let keys = expandable_keys(&build_render_plan(&events));
    if keys.is_empty() {
        return;
    }

    let index = state.ui.tool_cursor.unwrap_or(0).min(keys.len() - 1);
    state.ui.tool_cursor = Some(index);

    let key = keys[index].clone();
    if !state.ui.expanded.remove(&key) {
        state.ui.expanded.insert(key);
    }
}
