use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use thread_lens::app::{handle_key, AppState, ConfirmPrompt, InputMode, PanelFocus, ThreadAction};
use thread_lens::model::{
    AssistantTurn, ConversationEvent, HumanTurn, ThreadId, ThreadRecord, ToolInvocation,
    ToolResult, ToolStatus,
};
use thread_lens::resolve::ExpansionKey;

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::empty())
}

fn type_text(state: &mut AppState, text: &str) {
    for c in text.chars() {
        handle_key(state, key(KeyCode::Char(c)));
    }
}

fn two_tool_feed() -> Vec<ConversationEvent> {
    vec![
        AssistantTurn::new("m1")
            .with_invocation(ToolInvocation::new("a1", "search"))
            .into(),
        ToolResult::new("m2", ToolStatus::Success, "found")
            .for_invocation("a1")
            .into(),
        AssistantTurn::new("m3")
            .with_invocation(ToolInvocation::new("a2", "calc"))
            .into(),
        ToolResult::new("m4", ToolStatus::Error, "div by zero")
            .for_invocation("a2")
            .into(),
    ]
}

#[test]
fn quit_signal_set_by_q_key() {
    let mut state = AppState::new();
    handle_key(&mut state, key(KeyCode::Char('q')));
    assert!(state.meta.should_quit);
}

#[test]
fn compose_round_trip() {
    let mut state = AppState::new().with_current_thread("t1".into());

    handle_key(&mut state, key(KeyCode::Char('i')));
    assert_eq!(state.ui.mode, InputMode::Compose);

    type_text(&mut state, "helloo");
    handle_key(&mut state, key(KeyCode::Backspace));
    assert_eq!(state.ui.compose, "hello");

    handle_key(&mut state, key(KeyCode::Enter));
    assert_eq!(state.ui.mode, InputMode::Normal);
    assert_eq!(state.domain.local_messages.len(), 1);
    assert!(matches!(
        state.take_actions().as_slice(),
        [ThreadAction::Submit { .. }]
    ));
}

#[test]
fn esc_cancels_compose_without_submitting() {
    let mut state = AppState::new().with_current_thread("t1".into());
    handle_key(&mut state, key(KeyCode::Char('i')));
    type_text(&mut state, "draft");
    handle_key(&mut state, key(KeyCode::Esc));

    assert_eq!(state.ui.mode, InputMode::Normal);
    assert!(state.domain.local_messages.is_empty());
    assert!(state.take_actions().is_empty());
}

#[test]
fn whitespace_compose_is_never_submitted() {
    let mut state = AppState::new().with_current_thread("t1".into());
    handle_key(&mut state, key(KeyCode::Char('i')));
    type_text(&mut state, "   ");
    handle_key(&mut state, key(KeyCode::Enter));

    assert_eq!(state.ui.mode, InputMode::Compose);
    assert!(state.take_actions().is_empty());
}

#[test]
fn new_thread_on_empty_transcript_skips_confirmation() {
    let mut state = AppState::new();
    handle_key(&mut state, key(KeyCode::Char('n')));

    assert_eq!(state.ui.mode, InputMode::Normal);
    let current = state.domain.current_thread.clone().unwrap();
    assert_eq!(state.take_actions(), vec![ThreadAction::Create(current)]);
}

#[test]
fn new_thread_confirmation_can_be_declined() {
    let mut state = AppState::new().with_current_thread("t1".into());
    state.domain.feed = vec![HumanTurn::new("m1", "hi").into()];

    handle_key(&mut state, key(KeyCode::Char('n')));
    assert_eq!(state.ui.mode, InputMode::Confirm(ConfirmPrompt::NewThread));

    handle_key(&mut state, key(KeyCode::Char('n')));
    assert_eq!(state.ui.mode, InputMode::Normal);
    assert_eq!(state.domain.current_thread, Some(ThreadId::new("t1")));
    assert!(state.take_actions().is_empty());
}

#[test]
fn delete_current_thread_after_confirmation() {
    let mut state = AppState::new().with_current_thread("t1".into());
    state.domain.history = vec!["t0".into(), "t1".into()];
    state.domain.feed = vec![HumanTurn::new("m1", "hi").into()];

    handle_key(&mut state, key(KeyCode::Char('d')));
    assert_eq!(
        state.ui.mode,
        InputMode::Confirm(ConfirmPrompt::DeleteThread("t1".into()))
    );

    handle_key(&mut state, key(KeyCode::Char('y')));
    assert!(state.domain.current_thread.is_none());
    assert!(state.domain.feed.is_empty());
    assert_eq!(state.domain.history, vec![ThreadId::new("t0")]);
    assert_eq!(
        state.take_actions(),
        vec![ThreadAction::Delete("t1".into())]
    );
}

#[test]
fn thread_list_navigation_opens_highlighted_thread() {
    let mut state = AppState::new().with_current_thread("a".into());
    state.domain.history = vec!["a".into(), "b".into()];
    state.domain.threads = vec![ThreadRecord::new("c".into(), None, Utc::now())];

    handle_key(&mut state, key(KeyCode::Tab));
    assert_eq!(state.ui.focus, PanelFocus::Threads);

    handle_key(&mut state, key(KeyCode::Char('j')));
    handle_key(&mut state, key(KeyCode::Char('j')));
    handle_key(&mut state, key(KeyCode::Char('j')));
    assert_eq!(state.ui.selected_thread, Some(2));

    handle_key(&mut state, key(KeyCode::Enter));
    assert_eq!(state.domain.current_thread, Some(ThreadId::new("c")));
    assert_eq!(state.ui.focus, PanelFocus::Transcript);
    assert_eq!(state.take_actions(), vec![ThreadAction::Select("c".into())]);
    assert!(state.domain.history.contains(&ThreadId::new("c")));
}

#[test]
fn tool_cursor_and_expansion() {
    let mut state = AppState::new().with_current_thread("t1".into());
    state.domain.feed = two_tool_feed();

    handle_key(&mut state, key(KeyCode::Char(']')));
    assert_eq!(state.ui.tool_cursor, Some(0));
    handle_key(&mut state, key(KeyCode::Char(']')));
    handle_key(&mut state, key(KeyCode::Char(']')));
    assert_eq!(state.ui.tool_cursor, Some(1));

    handle_key(&mut state, key(KeyCode::Char('e')));
    assert!(state
        .ui
        .expanded
        .contains(&ExpansionKey::invocation("m3", "a2")));

    handle_key(&mut state, key(KeyCode::Enter));
    assert!(state.ui.expanded.is_empty());

    handle_key(&mut state, key(KeyCode::Char('[')));
    assert_eq!(state.ui.tool_cursor, Some(0));
}

#[test]
fn expansion_without_tools_is_noop() {
    let mut state = AppState::new().with_current_thread("t1".into());
    state.domain.feed = vec![HumanTurn::new("m1", "hi").into()];

    handle_key(&mut state, key(KeyCode::Char('e')));
    handle_key(&mut state, key(KeyCode::Char(']')));

    assert!(state.ui.expanded.is_empty());
    assert_eq!(state.ui.tool_cursor, None);
}

#[test]
fn scrolling_transcript_toggles_auto_scroll() {
    let mut state = AppState::new();
    assert!(state.ui.auto_scroll);

    handle_key(&mut state, key(KeyCode::Char('j')));
    assert_eq!(state.ui.transcript_scroll, 1);
    assert!(!state.ui.auto_scroll);

    handle_key(&mut state, key(KeyCode::Char('G')));
    assert!(state.ui.auto_scroll);

    handle_key(&mut state, key(KeyCode::Char('g')));
    assert_eq!(state.ui.transcript_scroll, 0);
    assert!(!state.ui.auto_scroll);

    handle_key(&mut state, key(KeyCode::Char(' ')));
    assert!(state.ui.auto_scroll);
}

#[test]
fn refresh_key_requests_reload() {
    let mut state = AppState::new();
    handle_key(&mut state, key(KeyCode::Char('r')));
    assert_eq!(state.take_actions(), vec![ThreadAction::Refresh]);
}

#[test]
fn s_key_stops_busy_thread() {
    let mut state = AppState::new().with_current_thread("t1".into());
    state.domain.feed = vec![HumanTurn::new("m0", "summarize").into()];

    handle_key(&mut state, key(KeyCode::Char('s')));
    assert_eq!(state.take_actions(), vec![ThreadAction::Stop("t1".into())]);
}

#[test]
fn ctrl_s_stops_while_composing() {
    let mut state = AppState::new().with_current_thread("t1".into());
    state.domain.feed = vec![HumanTurn::new("m0", "summarize").into()];
    state.ui.mode = InputMode::Compose;

    handle_key(
        &mut state,
        KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL),
    );
    assert_eq!(state.take_actions(), vec![ThreadAction::Stop("t1".into())]);
    assert!(state.ui.compose.is_empty());
}

#[test]
fn y_key_copies_latest_reply() {
    let mut state = AppState::new().with_current_thread("t1".into());
    state.domain.feed = vec![
        HumanTurn::new("m0", "hi").into(),
        AssistantTurn::new("m1").with_text("hello!").into(),
    ];

    handle_key(&mut state, key(KeyCode::Char('y')));
    assert_eq!(
        state.take_actions(),
        vec![ThreadAction::Copy("hello!".into())]
    );
}
