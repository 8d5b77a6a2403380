use super::ids::ThreadId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Title given to threads created without one.
pub const DEFAULT_THREAD_TITLE: &str = "New Conversation";

/// Persisted thread metadata. Rows are soft-deleted, never removed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThreadRecord {
    pub thread_id: ThreadId,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub last_accessed_at: DateTime<Utc>,
    #[serde(default)]
    pub is_deleted: bool,
}

impl ThreadRecord {
    pub fn new(thread_id: ThreadId, title: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            thread_id,
            title: normalize_title(title),
            created_at: now,
            last_accessed_at: now,
            is_deleted: false,
        }
    }
}

/// Blank or missing titles fall back to [`DEFAULT_THREAD_TITLE`].
pub fn normalize_title(title: Option<String>) -> String {
    title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_THREAD_TITLE.to_string())
}
