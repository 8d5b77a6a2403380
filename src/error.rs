//! Error types for thread-lens
//!
//! One thiserror enum per concern. `AppError` is the cloneable form carried
//! inside `AppEvent::Error` so the update loop can record it.

#[derive(Debug, Clone, thiserror::Error)]
pub enum ParseError {
    #[error("JSON parse: {0}")]
    Json(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("event index {index} out of bounds (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("event at index {index} is a {kind} event, not an assistant turn")]
    NotAssistantTurn { index: usize, kind: &'static str },
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("SQLite: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("thread id is required")]
    MissingThreadId,
    #[error("thread {0} already exists")]
    Duplicate(String),
    #[error("invalid timestamp {value}: {reason}")]
    Timestamp { value: String, reason: String },
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum FeedError {
    #[error("notify: {0}")]
    Notify(String),
    #[error("I/O: {0}")]
    Io(String),
    #[error("parse: {0}")]
    Parse(#[from] ParseError),
}

impl From<notify::Error> for FeedError {
    fn from(e: notify::Error) -> Self {
        FeedError::Notify(e.to_string())
    }
}

impl From<std::io::Error> for FeedError {
    fn from(e: std::io::Error) -> Self {
        FeedError::Io(e.to_string())
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum AppError {
    #[error("store: {0}")]
    Store(String),
    #[error(transparent)]
    Feed(#[from] FeedError),
    #[error("clipboard: {0}")]
    Clipboard(String),
}

impl From<arboard::Error> for AppError {
    fn from(e: arboard::Error) -> Self {
        AppError::Clipboard(e.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Store(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_error_display_names_index() {
        let error = ResolveError::NotAssistantTurn {
            index: 3,
            kind: "tool",
        };
        let display = error.to_string();
        assert!(display.contains("index 3"));
        assert!(display.contains("tool"));
    }

    #[test]
    fn store_io_error_preserves_source_kind() {
        let error = StoreError::Io {
            path: "/data/history.json".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(error.to_string().contains("/data/history.json"));

        let source_err = std::error::Error::source(&error).unwrap();
        let io_err = source_err.downcast_ref::<std::io::Error>().unwrap();
        assert_eq!(io_err.kind(), std::io::ErrorKind::NotFound);
    }

    #[test]
    fn store_error_converts_to_app_error() {
        let app: AppError = StoreError::Duplicate("t1".into()).into();
        assert_eq!(app.to_string(), "store: thread t1 already exists");
    }

    #[test]
    fn feed_parse_error_is_transparent() {
        let app: AppError = FeedError::Parse(ParseError::Json("line 2: eof".into())).into();
        assert_eq!(app.to_string(), "parse: JSON parse: line 2: eof");
    }
}
