//! Imperative shell: executes the `ThreadAction`s queued by `update` against
//! the store, the history port and the feed transport.

use std::sync::mpsc;

use chrono::Utc;

use crate::app::ThreadAction;
use crate::error::AppError;
use crate::event::AppEvent;
use crate::feed::{self, CancelRequest, FeedWatcher, Outbox};
use crate::model::ThreadId;
use crate::paths::Paths;
use crate::store::{ThreadHistory, ThreadStore};

/// Owns every side-effecting collaborator. Results come back as `AppEvent`s
/// for the caller to feed into `update`.
pub struct Shell<S, H> {
    store: S,
    history: H,
    outbox: Outbox,
    paths: Paths,
    feed_tx: mpsc::Sender<AppEvent>,
    watcher: Option<FeedWatcher>,
    /// Opened on first copy and kept alive; on X11 the clipboard contents
    /// are served by this handle.
    clipboard: Option<arboard::Clipboard>,
}

impl<S: ThreadStore, H: ThreadHistory> Shell<S, H> {
    /// `feed_tx` receives feed batches from the active watcher.
    pub fn new(store: S, history: H, paths: Paths, feed_tx: mpsc::Sender<AppEvent>) -> Self {
        Self {
            store,
            history,
            outbox: Outbox::new(paths.feed_dir.clone()),
            paths,
            feed_tx,
            watcher: None,
            clipboard: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn outbox(&self) -> &Outbox {
        &self.outbox
    }

    /// Thread whose feed is currently tailed.
    pub fn watched_thread(&self) -> Option<&ThreadId> {
        self.watcher.as_ref().map(FeedWatcher::thread_id)
    }

    /// Snapshot of store threads and local history.
    pub fn load_threads(&self) -> Result<AppEvent, AppError> {
        let threads = self.store.list()?;
        let history = self.history.read_list()?;
        tracing::debug!(threads = threads.len(), history = history.len(), "threads loaded");
        Ok(AppEvent::ThreadsLoaded { threads, history })
    }

    /// Run one action. Failures are reported as `AppEvent::Error` and never
    /// abort the remaining steps of the action.
    pub fn execute(&mut self, action: ThreadAction) -> Vec<AppEvent> {
        let mut events = Vec::new();

        match action {
            ThreadAction::Create(thread_id) => {
                match self.store.create(&thread_id, None) {
                    Ok(record) => events.push(AppEvent::ThreadCreated(record)),
                    Err(e) => events.push(failure(format!("create {}", thread_id), e)),
                }
                if let Err(e) = self.history.append(&thread_id) {
                    events.push(failure("history", e));
                }
                self.watch(thread_id, &mut events);
            }

            ThreadAction::Select(thread_id) => {
                match self.store.touch_last_accessed(&thread_id) {
                    Ok(0) => tracing::debug!(thread_id = %thread_id, "selected thread not in store"),
                    Ok(_) => {}
                    Err(e) => events.push(failure(format!("select {}", thread_id), e)),
                }
                if let Err(e) = self.history.append(&thread_id) {
                    events.push(failure("history", e));
                }
                self.watch(thread_id, &mut events);
            }

            ThreadAction::Delete(thread_id) => {
                if let Err(e) = self.store.soft_delete(&thread_id) {
                    events.push(failure(format!("delete {}", thread_id), e));
                }
                if let Err(e) = self.history.remove(&thread_id) {
                    events.push(failure("history", e));
                }
                if self.watched_thread() == Some(&thread_id) {
                    self.watcher = None;
                }
            }

            ThreadAction::Submit { thread_id, turn } => {
                if let Err(e) = self.outbox.submit(&thread_id, &turn) {
                    events.push(failure(format!("submit {}", thread_id), e));
                }
            }

            ThreadAction::Stop(thread_id) => {
                let request = CancelRequest::new(Utc::now());
                if let Err(e) = self.outbox.cancel(&thread_id, &request) {
                    events.push(failure(format!("stop {}", thread_id), e));
                }
            }

            ThreadAction::Copy(text) => match self.copy(&text) {
                Ok(()) => events.push(AppEvent::Copied {
                    chars: text.chars().count(),
                }),
                Err(e) => events.push(failure("clipboard", e)),
            },

            ThreadAction::Refresh => match self.load_threads() {
                Ok(event) => events.push(event),
                Err(error) => events.push(AppEvent::Error {
                    source: "refresh".to_string(),
                    error,
                }),
            },
        }

        events
    }

    fn copy(&mut self, text: &str) -> Result<(), arboard::Error> {
        let clipboard = match self.clipboard.take() {
            Some(clipboard) => clipboard,
            None => arboard::Clipboard::new()?,
        };
        self.clipboard.insert(clipboard).set_text(text.to_owned())
    }

    /// Replace the active watcher with one for `thread_id`.
    fn watch(&mut self, thread_id: ThreadId, events: &mut Vec<AppEvent>) {
        if self.watched_thread() == Some(&thread_id) {
            return;
        }
        // Stop the old worker before the new one starts replaying.
        self.watcher = None;

        let path = self.paths.feed_file(&thread_id);
        match feed::start_watching(&path, thread_id.clone(), self.feed_tx.clone()) {
            Ok(watcher) => self.watcher = Some(watcher),
            Err(e) => {
                tracing::error!(thread_id = %thread_id, error = %e, "failed to watch feed");
                events.push(failure(format!("watch {}", thread_id), e));
            }
        }
    }
}

fn failure(source: impl Into<String>, error: impl Into<AppError>) -> AppEvent {
    let source = source.into();
    let error = error.into();
    tracing::warn!(source = %source, error = %error, "action failed");
    AppEvent::Error { source, error }
}
