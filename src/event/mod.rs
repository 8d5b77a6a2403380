use chrono::{DateTime, Utc};
use crossterm::event::KeyEvent;

use crate::error::AppError;
use crate::model::{ConversationEvent, ThreadId, ThreadRecord};

/// All events that can occur in the application.
/// Sourced from the feed watcher, keyboard input, timers, and store results.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// New events appended to a thread's feed
    FeedAppended {
        thread_id: ThreadId,
        events: Vec<ConversationEvent>,
    },

    /// Feed was rewritten; `events` is the complete new snapshot
    FeedReplaced {
        thread_id: ThreadId,
        events: Vec<ConversationEvent>,
    },

    /// Thread list and local history (re)loaded
    ThreadsLoaded {
        threads: Vec<ThreadRecord>,
        history: Vec<ThreadId>,
    },

    /// Store acknowledged a new thread
    ThreadCreated(ThreadRecord),

    /// Text was placed on the clipboard
    Copied { chars: usize },

    /// Keyboard input event
    Key(KeyEvent),

    /// Timer tick
    Tick(DateTime<Utc>),

    /// Error occurred (non-fatal - parse, I/O, watcher, store)
    Error { source: String, error: AppError },
}
