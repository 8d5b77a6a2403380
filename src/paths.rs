use std::path::{Path, PathBuf};

use crate::model::ThreadId;

/// Resolved file locations for thread-lens.
/// Pure data structure with no I/O.
#[derive(Debug, Clone)]
pub struct Paths {
    /// SQLite database holding thread metadata
    /// Example: <data_dir>/threads.db
    pub database: PathBuf,

    /// JSON list of thread ids opened from this client
    /// Example: <data_dir>/history.json
    pub history: PathBuf,

    /// Directory with one `<thread_id>.jsonl` feed per thread
    /// Example: <data_dir>/feeds/
    pub feed_dir: PathBuf,

    /// Log file (the terminal belongs to the TUI)
    /// Example: <data_dir>/thread-lens.log
    pub log_file: PathBuf,
}

impl Paths {
    /// Resolves all paths under `data_dir`, or under the default data
    /// directory when `None`.
    ///
    /// Does NOT create directories - that is the caller's responsibility.
    ///
    /// # Environment
    ///
    /// * `HOME` - Used for the default `~/.local/share/thread-lens/`. Falls back to `/tmp`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::Path;
    /// use thread_lens::paths::Paths;
    ///
    /// let paths = Paths::resolve(Some(Path::new("/srv/chat")));
    ///
    /// assert_eq!(paths.database, Path::new("/srv/chat/threads.db"));
    /// assert_eq!(paths.feed_dir, Path::new("/srv/chat/feeds"));
    /// ```
    pub fn resolve(data_dir: Option<&Path>) -> Self {
        let root = data_dir
            .map(Path::to_path_buf)
            .unwrap_or_else(default_data_dir);

        Self {
            database: root.join("threads.db"),
            history: root.join("history.json"),
            feed_dir: root.join("feeds"),
            log_file: root.join("thread-lens.log"),
        }
    }

    pub fn with_feed_dir(mut self, feed_dir: PathBuf) -> Self {
        self.feed_dir = feed_dir;
        self
    }

    pub fn with_log_file(mut self, log_file: PathBuf) -> Self {
        self.log_file = log_file;
        self
    }

    /// Feed file the transport writes for `thread_id`.
    pub fn feed_file(&self, thread_id: &ThreadId) -> PathBuf {
        self.feed_dir.join(format!("{}.jsonl", thread_id))
    }
}

fn default_data_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home)
        .join(".local")
        .join("share")
        .join("thread-lens")
}
