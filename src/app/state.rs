use std::collections::{BTreeSet, VecDeque};

use chrono::{DateTime, Utc};

use super::ComposeBuffer;
use crate::model::{ConversationEvent, HumanTurn, ThreadId, ThreadRecord};
use crate::resolve::{awaiting_response, ExpansionKey};

/// Max errors kept for the footer.
pub const MAX_ERRORS: usize = 100;

/// Main application state.
/// Updated via `update(&mut state, event)`; side effects are requested
/// through `meta.actions` and executed by the main loop.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub domain: DomainState,
    pub ui: UiState,
    pub meta: MetaState,
}

/// Data shown by the app.
#[derive(Debug, Clone, Default)]
pub struct DomainState {
    /// Live thread records from the store, most recently accessed first
    pub threads: Vec<ThreadRecord>,

    /// Thread ids opened from this client, oldest first
    pub history: Vec<ThreadId>,

    pub current_thread: Option<ThreadId>,

    /// Feed snapshot for the current thread, in arrival order
    pub feed: Vec<ConversationEvent>,

    /// Submitted messages not yet echoed back by the feed
    pub local_messages: Vec<HumanTurn>,

    /// A cancel was sent and the feed has not changed since
    pub stop_requested: bool,
}

/// Presentation-only state.
#[derive(Debug, Clone)]
pub struct UiState {
    pub mode: InputMode,
    pub focus: PanelFocus,
    pub compose: ComposeBuffer,
    /// Highlighted row in the thread list
    pub selected_thread: Option<usize>,
    pub transcript_scroll: usize,
    pub auto_scroll: bool,
    pub expanded: BTreeSet<ExpansionKey>,
    /// Index into the transcript's expandable tool outputs
    pub tool_cursor: Option<usize>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            mode: InputMode::Normal,
            focus: PanelFocus::Transcript,
            compose: ComposeBuffer::new(),
            selected_thread: None,
            transcript_scroll: 0,
            auto_scroll: true,
            expanded: BTreeSet::new(),
            tool_cursor: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MetaState {
    /// Error ring buffer (latest last)
    pub errors: VecDeque<String>,
    /// One-shot status message, cleared on the next key press
    pub notice: Option<String>,
    pub should_quit: bool,
    pub actions: VecDeque<ThreadAction>,
    pub last_tick: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Compose,
    Confirm(ConfirmPrompt),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmPrompt {
    NewThread,
    DeleteThread(ThreadId),
}

impl ConfirmPrompt {
    pub fn message(&self) -> &'static str {
        match self {
            ConfirmPrompt::NewThread => "Start a new conversation? Current messages will be saved.",
            ConfirmPrompt::DeleteThread(_) => "Delete this conversation? This cannot be undone.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelFocus {
    Threads,
    Transcript,
}

/// Side effects requested by the update loop.
#[derive(Debug, Clone, PartialEq)]
pub enum ThreadAction {
    Create(ThreadId),
    Select(ThreadId),
    Delete(ThreadId),
    Submit { thread_id: ThreadId, turn: HumanTurn },
    /// Ask the agent to stop working on the thread
    Stop(ThreadId),
    /// Put text on the system clipboard
    Copy(String),
    Refresh,
}

/// One row of the thread list.
#[derive(Debug, Clone, PartialEq)]
pub struct ThreadEntry {
    pub thread_id: ThreadId,
    pub label: String,
    pub title: Option<String>,
    pub is_current: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_current_thread(mut self, thread_id: ThreadId) -> Self {
        self.domain.current_thread = Some(thread_id);
        self
    }

    /// Feed events followed by not-yet-echoed local messages.
    pub fn display_events(&self) -> Vec<ConversationEvent> {
        self.domain
            .feed
            .iter()
            .cloned()
            .chain(
                self.domain
                    .local_messages
                    .iter()
                    .cloned()
                    .map(ConversationEvent::HumanTurn),
            )
            .collect()
    }

    /// The agent owes a response on the current thread.
    pub fn is_awaiting_response(&self) -> bool {
        self.domain.current_thread.is_some() && awaiting_response(&self.display_events())
    }

    pub fn has_messages(&self) -> bool {
        !self.domain.feed.is_empty() || !self.domain.local_messages.is_empty()
    }

    pub fn thread_record(&self, thread_id: &ThreadId) -> Option<&ThreadRecord> {
        self.domain
            .threads
            .iter()
            .find(|record| &record.thread_id == thread_id)
    }

    /// History first (labelled by position), then store threads this client
    /// has not opened yet.
    pub fn thread_entries(&self) -> Vec<ThreadEntry> {
        let extra = self
            .domain
            .threads
            .iter()
            .map(|record| &record.thread_id)
            .filter(|id| !self.domain.history.contains(id));

        self.domain
            .history
            .iter()
            .chain(extra)
            .enumerate()
            .map(|(i, id)| ThreadEntry {
                thread_id: id.clone(),
                label: format!("Thread {}", i + 1),
                title: self.thread_record(id).map(|r| r.title.clone()),
                is_current: self.domain.current_thread.as_ref() == Some(id),
            })
            .collect()
    }

    pub fn push_error(&mut self, message: String) {
        if self.meta.errors.len() >= MAX_ERRORS {
            self.meta.errors.pop_front();
        }
        self.meta.errors.push_back(message);
    }

    pub fn latest_error(&self) -> Option<&str> {
        self.meta.errors.back().map(String::as_str)
    }

    pub fn request(&mut self, action: ThreadAction) {
        self.meta.actions.push_back(action);
    }

    /// Drain pending side effects in request order.
    pub fn take_actions(&mut self) -> Vec<ThreadAction> {
        self.meta.actions.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ToolResult;
    use crate::model::ToolStatus;

    #[test]
    fn display_events_appends_local_messages_last() {
        let mut state = AppState::new();
        state
            .domain
            .feed
            .push(ToolResult::new("m1", ToolStatus::Success, "x").into());
        state.domain.local_messages.push(HumanTurn::new("local", "hi"));

        let events = state.display_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].id().as_str(), "local");
    }

    #[test]
    fn awaiting_response_counts_local_messages() {
        let mut state = AppState::new().with_current_thread("t1".into());
        assert!(!state.is_awaiting_response());

        state.domain.local_messages.push(HumanTurn::new("local", "hi"));
        assert!(state.is_awaiting_response());

        state.domain.current_thread = None;
        assert!(!state.is_awaiting_response());
    }

    #[test]
    fn error_ring_buffer_evicts_oldest() {
        let mut state = AppState::new();
        for i in 0..MAX_ERRORS + 5 {
            state.push_error(format!("e{}", i));
        }
        assert_eq!(state.meta.errors.len(), MAX_ERRORS);
        assert_eq!(state.meta.errors.front().unwrap(), "e5");
        assert_eq!(state.latest_error(), Some("e104"));
    }

    #[test]
    fn take_actions_drains_in_order() {
        let mut state = AppState::new();
        state.request(ThreadAction::Refresh);
        state.request(ThreadAction::Delete("t1".into()));

        let actions = state.take_actions();
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0], ThreadAction::Refresh);
        assert!(state.take_actions().is_empty());
    }

    #[test]
    fn thread_entries_lists_history_then_store_only_threads() {
        let now = Utc::now();
        let mut state = AppState::new().with_current_thread("b".into());
        state.domain.history = vec!["a".into(), "b".into()];
        state.domain.threads = vec![
            ThreadRecord::new("c".into(), Some("From elsewhere".into()), now),
            ThreadRecord::new("b".into(), Some("Trip".into()), now),
        ];

        let entries = state.thread_entries();
        let ids: Vec<&str> = entries.iter().map(|e| e.thread_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(entries[1].title.as_deref(), Some("Trip"));
        assert!(entries[1].is_current);
        assert_eq!(entries[2].label, "Thread 3");
        assert!(entries[0].title.is_none());
    }
}
