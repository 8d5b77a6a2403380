use crate::app::{handle_key, AppState, ConfirmPrompt, InputMode, ThreadAction};
use crate::event::AppEvent;
use crate::model::{ConversationEvent, EventId, HumanTurn, ThreadId, ThreadRecord};
use crate::resolve::{build_render_plan, expandable_keys, expandable_outputs};

/// Update function following Elm Architecture.
/// Mutates state in response to one event; never performs I/O. Anything that
/// needs the store or transport is queued as a `ThreadAction`.
pub fn update(state: &mut AppState, event: AppEvent) {
    match event {
        AppEvent::FeedAppended { thread_id, events } => {
            if !is_current(state, &thread_id) {
                return;
            }
            state.domain.feed.extend(events);
            state.domain.stop_requested = false;
            reconcile_local_messages(state);
            clamp_tool_cursor(state);
        }

        AppEvent::FeedReplaced { thread_id, events } => {
            if !is_current(state, &thread_id) {
                return;
            }
            state.domain.feed = events;
            state.domain.stop_requested = false;
            reconcile_local_messages(state);
            clamp_tool_cursor(state);
        }

        AppEvent::ThreadsLoaded { threads, history } => {
            state.domain.threads = threads;
            state.domain.history = history;
            if let Some(current) = state.domain.current_thread.clone() {
                remember(state, &current);
            }
            clamp_thread_selection(state);
        }

        AppEvent::ThreadCreated(record) => {
            upsert_thread(state, record);
            clamp_thread_selection(state);
        }

        AppEvent::Key(key) => {
            state.meta.notice = None;
            handle_key(state, key);
        }

        AppEvent::Copied { chars } => {
            state.meta.notice = Some(format!("Copied {} chars to clipboard", chars));
        }

        AppEvent::Tick(now) => {
            state.meta.last_tick = Some(now);
        }

        AppEvent::Error { source, error } => {
            state.push_error(format!("{}: {}", source, error));
        }
    }
}

fn is_current(state: &AppState, thread_id: &ThreadId) -> bool {
    state.domain.current_thread.as_ref() == Some(thread_id)
}

/// Drop local messages whose text the feed has since echoed as a human turn.
pub fn reconcile_local_messages(state: &mut AppState) {
    if state.domain.local_messages.is_empty() {
        return;
    }

    let echoed: Vec<&str> = state
        .domain
        .feed
        .iter()
        .filter_map(|event| match event {
            ConversationEvent::HumanTurn(turn) => Some(turn.text.as_str()),
            _ => None,
        })
        .collect();

    let kept: Vec<HumanTurn> = state
        .domain
        .local_messages
        .iter()
        .filter(|local| !echoed.contains(&local.text.as_str()))
        .cloned()
        .collect();
    state.domain.local_messages = kept;
}

/// Switch to `thread_id`, clearing everything tied to the previous thread.
pub fn select_thread(state: &mut AppState, thread_id: ThreadId) {
    if is_current(state, &thread_id) {
        return;
    }
    open_thread(state, thread_id.clone());
    state.request(ThreadAction::Select(thread_id));
}

/// Ask before discarding a non-empty transcript, otherwise create directly.
pub fn request_new_thread(state: &mut AppState) {
    if state.has_messages() {
        state.ui.mode = InputMode::Confirm(ConfirmPrompt::NewThread);
    } else {
        create_thread(state);
    }
}

/// Open a fresh thread with a generated id and ask the store to record it.
pub fn create_thread(state: &mut AppState) -> ThreadId {
    let thread_id = ThreadId::generate();
    open_thread(state, thread_id.clone());
    state.request(ThreadAction::Create(thread_id.clone()));
    thread_id
}

pub fn request_delete_thread(state: &mut AppState, thread_id: ThreadId) {
    state.ui.mode = InputMode::Confirm(ConfirmPrompt::DeleteThread(thread_id));
}

pub fn delete_thread(state: &mut AppState, thread_id: ThreadId) {
    state.domain.history.retain(|id| id != &thread_id);
    state.domain.threads.retain(|r| r.thread_id != thread_id);
    if is_current(state, &thread_id) {
        state.domain.current_thread = None;
        clear_transcript(state);
    }
    clamp_thread_selection(state);
    state.request(ThreadAction::Delete(thread_id));
}

/// Submit the compose buffer. Blank input is ignored, and so is input while
/// the agent still owes a response; with no current thread one is created
/// first.
pub fn submit_compose(state: &mut AppState) {
    let text = state.ui.compose.text().trim().to_string();
    if text.is_empty() || state.is_awaiting_response() {
        return;
    }

    let thread_id = match state.domain.current_thread.clone() {
        Some(id) => id,
        None => create_thread(state),
    };

    let turn = HumanTurn::new(EventId::generate(), text);
    state.domain.local_messages.push(turn.clone());
    state.ui.compose.clear();
    state.ui.mode = InputMode::Normal;
    state.ui.auto_scroll = true;
    state.request(ThreadAction::Submit { thread_id, turn });
}

/// Ask the transport to cancel the in-flight response. Only one request is
/// sent until the feed changes.
pub fn request_stop(state: &mut AppState) {
    if state.domain.stop_requested || !state.is_awaiting_response() {
        return;
    }
    if let Some(thread_id) = state.domain.current_thread.clone() {
        state.domain.stop_requested = true;
        state.request(ThreadAction::Stop(thread_id));
    }
}

/// Copy the tool output under the cursor, or else the latest assistant text.
pub fn copy_message(state: &mut AppState) {
    let events = state.display_events();
    let plan = build_render_plan(&events);

    let from_cursor = state
        .ui
        .tool_cursor
        .and_then(|i| expandable_outputs(&plan).get(i).map(|(_, result)| result.text.clone()));
    let text = from_cursor.or_else(|| {
        events.iter().rev().find_map(|event| {
            event
                .as_assistant()
                .and_then(|turn| turn.text.clone())
                .filter(|text| !text.trim().is_empty())
        })
    });

    match text {
        Some(text) => state.request(ThreadAction::Copy(text)),
        None => state.meta.notice = Some("Nothing to copy".to_string()),
    }
}

fn open_thread(state: &mut AppState, thread_id: ThreadId) {
    remember(state, &thread_id);
    state.domain.current_thread = Some(thread_id);
    clear_transcript(state);
    state.ui.selected_thread = state
        .thread_entries()
        .iter()
        .position(|entry| entry.is_current);
}

fn clear_transcript(state: &mut AppState) {
    state.domain.feed.clear();
    state.domain.local_messages.clear();
    state.domain.stop_requested = false;
    state.ui.expanded.clear();
    state.ui.tool_cursor = None;
    state.ui.transcript_scroll = 0;
    state.ui.auto_scroll = true;
}

fn remember(state: &mut AppState, thread_id: &ThreadId) {
    if !state.domain.history.contains(thread_id) {
        state.domain.history.push(thread_id.clone());
    }
}

fn upsert_thread(state: &mut AppState, record: ThreadRecord) {
    state
        .domain
        .threads
        .retain(|existing| existing.thread_id != record.thread_id);
    state.domain.threads.insert(0, record);
}

fn clamp_thread_selection(state: &mut AppState) {
    let count = state.thread_entries().len();
    state.ui.selected_thread = match (count, state.ui.selected_thread) {
        (0, _) => None,
        (n, Some(i)) => Some(i.min(n - 1)),
        (_, None) => None,
    };
}

fn clamp_tool_cursor(state: &mut AppState) {
    if let Some(cursor) = state.ui.tool_cursor {
        let events = state.display_events();
        let plan = build_render_plan(&events);
        let count = expandable_keys(&plan).len();
        state.ui.tool_cursor = if count == 0 {
            None
        } else {
            Some(cursor.min(count - 1))
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ToolResult, ToolStatus};

    #[test]
    fn feed_for_other_thread_is_ignored() {
        let mut state = AppState::new().with_current_thread("t1".into());
        update(
            &mut state,
            AppEvent::FeedAppended {
                thread_id: "t2".into(),
                events: vec![ToolResult::new("m1", ToolStatus::Success, "x").into()],
            },
        );
        assert!(state.domain.feed.is_empty());
    }

    #[test]
    fn reconcile_drops_echoed_messages_only() {
        let mut state = AppState::new();
        state.domain.local_messages = vec![HumanTurn::new("l1", "hi"), HumanTurn::new("l2", "bye")];
        state.domain.feed = vec![HumanTurn::new("m1", "hi").into()];

        reconcile_local_messages(&mut state);

        assert_eq!(state.domain.local_messages.len(), 1);
        assert_eq!(state.domain.local_messages[0].text, "bye");
    }

    #[test]
    fn select_same_thread_is_noop() {
        let mut state = AppState::new().with_current_thread("t1".into());
        state.domain.feed = vec![HumanTurn::new("m1", "hi").into()];

        select_thread(&mut state, "t1".into());

        assert_eq!(state.domain.feed.len(), 1);
        assert!(state.take_actions().is_empty());
    }

    #[test]
    fn stop_is_requested_once_while_busy() {
        let mut state = AppState::new().with_current_thread("t1".into());
        request_stop(&mut state);
        assert!(state.take_actions().is_empty());

        state.domain.feed = vec![HumanTurn::new("m1", "hi").into()];
        request_stop(&mut state);
        request_stop(&mut state);
        assert_eq!(state.take_actions(), vec![ThreadAction::Stop("t1".into())]);
        assert!(state.domain.stop_requested);
    }

    #[test]
    fn blank_compose_is_not_submitted() {
        let mut state = AppState::new().with_current_thread("t1".into());
        state.ui.compose = "   ".into();
        submit_compose(&mut state);
        assert!(state.domain.local_messages.is_empty());
        assert!(state.take_actions().is_empty());
    }
}
