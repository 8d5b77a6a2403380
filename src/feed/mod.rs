//! Read side (and the outbox write side) of the agent transport boundary.
//!
//! The transport writes one JSONL file per thread; this module tails it and
//! turns new lines into `AppEvent`s.

mod outbox;
mod parsers;
mod tail;

pub use outbox::{CancelRequest, Outbox};
pub use parsers::{parse_feed, parse_feed_lenient, to_feed_line};
pub use tail::{TailRead, TailState};

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Duration;

use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};

use crate::error::FeedError;
use crate::event::AppEvent;
use crate::model::ThreadId;

pub type FeedResult<T> = Result<T, FeedError>;

/// Poll interval; inotify can miss appends on some filesystems (tmpfs).
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Live subscription to one thread's feed. Dropping it stops the worker threads.
pub struct FeedWatcher {
    thread_id: ThreadId,
    stop: Arc<AtomicBool>,
    _watcher: RecommendedWatcher,
}

impl FeedWatcher {
    pub fn thread_id(&self) -> &ThreadId {
        &self.thread_id
    }
}

impl Drop for FeedWatcher {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

/// Start tailing `path` for `thread_id`, sending events on `tx`.
///
/// # Imperative Shell
/// Sets up the notify watcher and worker threads; parsing is delegated to
/// the pure functions in `parsers`.
///
/// The first read is sent as `FeedReplaced`, so a fresh watcher always
/// delivers the complete snapshot before any increments. Batches still queued
/// from an earlier watcher of the same thread are overwritten by it. A feed
/// file that does not exist yet is delivered as an empty snapshot.
pub fn start_watching(
    path: &Path,
    thread_id: ThreadId,
    tx: mpsc::Sender<AppEvent>,
) -> FeedResult<FeedWatcher> {
    let (read_tx, read_rx) = mpsc::channel::<()>();
    let stop = Arc::new(AtomicBool::new(false));

    start_tail_worker(path.to_path_buf(), thread_id.clone(), read_rx, tx, stop.clone());

    let watched_file = path.to_path_buf();
    let notify_tx = read_tx.clone();
    let mut watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| {
            if let Ok(event) = res {
                if event.paths.iter().any(|p| p == &watched_file) {
                    let _ = notify_tx.send(());
                }
            }
        },
        Config::default().with_poll_interval(POLL_INTERVAL),
    )?;

    // Watch the parent so the feed file may appear after startup.
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
        watcher.watch(dir, RecursiveMode::NonRecursive)?;
    }

    let poll_stop = stop.clone();
    std::thread::spawn(move || {
        while !poll_stop.load(Ordering::Relaxed) {
            if read_tx.send(()).is_err() {
                return;
            }
            std::thread::sleep(POLL_INTERVAL);
        }
    });

    tracing::info!(thread_id = %thread_id, path = %path.display(), "watching feed");

    Ok(FeedWatcher {
        thread_id,
        stop,
        _watcher: watcher,
    })
}

/// Worker thread owning the TailState. Read requests are coalesced: a burst
/// of notifications results in a single read.
fn start_tail_worker(
    path: PathBuf,
    thread_id: ThreadId,
    read_rx: mpsc::Receiver<()>,
    tx: mpsc::Sender<AppEvent>,
    stop: Arc<AtomicBool>,
) {
    std::thread::spawn(move || {
        let mut tail_state = TailState::new();
        let mut snapshot_sent = false;

        while read_rx.recv().is_ok() {
            while read_rx.try_recv().is_ok() {}

            if stop.load(Ordering::Relaxed) {
                return;
            }
            if !path.exists() {
                if !snapshot_sent {
                    snapshot_sent = true;
                    let event = AppEvent::FeedReplaced {
                        thread_id: thread_id.clone(),
                        events: Vec::new(),
                    };
                    if tx.send(event).is_err() {
                        return;
                    }
                }
                continue;
            }

            let read = match tail_state.read_new_lines(&path) {
                Ok(read) => read,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "feed read failed");
                    let event = AppEvent::Error {
                        source: path.display().to_string(),
                        error: FeedError::from(e).into(),
                    };
                    if tx.send(event).is_err() {
                        return;
                    }
                    continue;
                }
            };

            let replace = read.truncated || !snapshot_sent;
            snapshot_sent = true;
            if !replace && read.content.is_empty() {
                continue;
            }

            if let Some(event) = batch_event(&path, &thread_id, read, replace, &tx) {
                if tx.send(event).is_err() {
                    return;
                }
            }
        }
    });
}

/// Turn one tail read into the event the app consumes, reporting any bad
/// lines on the side. `replace` marks a full snapshot (first read or
/// truncation); those are sent even when empty.
fn batch_event(
    path: &Path,
    thread_id: &ThreadId,
    read: TailRead,
    replace: bool,
    tx: &mpsc::Sender<AppEvent>,
) -> Option<AppEvent> {
    let (events, errors) = parse_feed_lenient(&read.content);

    for error in errors {
        tracing::warn!(path = %path.display(), error = %error, "skipping malformed feed line");
        let _ = tx.send(AppEvent::Error {
            source: path.display().to_string(),
            error: FeedError::Parse(error).into(),
        });
    }

    if replace {
        if read.truncated {
            tracing::info!(thread_id = %thread_id, "feed truncated, replacing snapshot");
        }
        tracing::debug!(thread_id = %thread_id, count = events.len(), "feed snapshot");
        return Some(AppEvent::FeedReplaced {
            thread_id: thread_id.clone(),
            events,
        });
    }

    if events.is_empty() {
        return None;
    }

    tracing::debug!(thread_id = %thread_id, count = events.len(), "feed appended");
    Some(AppEvent::FeedAppended {
        thread_id: thread_id.clone(),
        events,
    })
}
