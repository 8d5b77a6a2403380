use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::parsers::to_feed_line;
use super::FeedResult;
use crate::error::{FeedError, ParseError};
use crate::model::{ConversationEvent, EventId, HumanTurn, ThreadId};

/// Outbox line asking the transport to stop the in-flight response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "cancel")]
pub struct CancelRequest {
    pub id: EventId,
    pub requested_at: DateTime<Utc>,
}

impl CancelRequest {
    pub fn new(requested_at: DateTime<Utc>) -> Self {
        Self {
            id: EventId::generate(),
            requested_at,
        }
    }
}

/// Where submitted human turns and cancel requests are handed to the
/// transport: one `<thread_id>.outbox.jsonl` per thread, append-only.
#[derive(Debug, Clone)]
pub struct Outbox {
    dir: PathBuf,
}

impl Outbox {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, thread_id: &ThreadId) -> PathBuf {
        outbox_path(&self.dir, thread_id)
    }

    /// Append a human turn for the transport to deliver.
    pub fn submit(&self, thread_id: &ThreadId, turn: &HumanTurn) -> FeedResult<PathBuf> {
        let line = to_feed_line(&ConversationEvent::HumanTurn(turn.clone()))?;
        let path = self.append_line(thread_id, &line)?;

        tracing::info!(thread_id = %thread_id, event_id = %turn.id, "submitted message to outbox");
        Ok(path)
    }

    /// Append a cancel request for the thread's in-flight response.
    pub fn cancel(&self, thread_id: &ThreadId, request: &CancelRequest) -> FeedResult<PathBuf> {
        let mut line =
            serde_json::to_string(request).map_err(|e| ParseError::Json(e.to_string()))?;
        line.push('\n');
        let path = self.append_line(thread_id, &line)?;

        tracing::info!(thread_id = %thread_id, event_id = %request.id, "requested stop");
        Ok(path)
    }

    fn append_line(&self, thread_id: &ThreadId, line: &str) -> FeedResult<PathBuf> {
        let path = self.path_for(thread_id);
        fs::create_dir_all(&self.dir)?;

        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        file.write_all(line.as_bytes())
            .map_err(|e| FeedError::Io(format!("{}: {}", path.display(), e)))?;
        Ok(path)
    }
}

fn outbox_path(dir: &Path, thread_id: &ThreadId) -> PathBuf {
    dir.join(format!("{}.outbox.jsonl", thread_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::parse_feed;
    use tempfile::TempDir;

    #[test]
    fn submit_appends_one_line_per_message() {
        let dir = TempDir::new().unwrap();
        let outbox = Outbox::new(dir.path().join("feeds"));
        let thread: ThreadId = "t1".into();

        outbox.submit(&thread, &HumanTurn::new("m1", "hello")).unwrap();
        let path = outbox.submit(&thread, &HumanTurn::new("m2", "again")).unwrap();

        let content = fs::read_to_string(path).unwrap();
        let events = parse_feed(&content).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].id().as_str(), "m2");
    }

    #[test]
    fn cancel_appends_typed_record_after_messages() {
        let dir = TempDir::new().unwrap();
        let outbox = Outbox::new(dir.path());
        let thread: ThreadId = "t1".into();

        outbox.submit(&thread, &HumanTurn::new("m1", "hello")).unwrap();
        let request = CancelRequest::new(Utc::now());
        let path = outbox.cancel(&thread, &request).unwrap();

        let content = fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        let value: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(value["type"], "cancel");
        assert_eq!(value["id"], request.id.as_str());
        let parsed: CancelRequest = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(parsed, request);
    }

    #[test]
    fn outbox_file_is_named_after_thread() {
        let outbox = Outbox::new("/data/feeds");
        assert_eq!(
            outbox.path_for(&"abc".into()),
            PathBuf::from("/data/feeds/abc.outbox.jsonl")
        );
    }
}
