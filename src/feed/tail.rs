use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// Outcome of one incremental read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TailRead {
    /// Complete lines appended since the last read.
    pub content: String,
    /// File shrank since the last read; `content` is a full re-read.
    pub truncated: bool,
}

/// Byte offsets into append-only files, for incremental reading.
///
/// Only whole lines are consumed. A trailing line still being written stays
/// unread until its newline lands.
#[derive(Debug, Clone, Default)]
pub struct TailState {
    offsets: HashMap<PathBuf, u64>,
}

impl TailState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current offset for a file (0 if never read)
    pub fn offset(&self, path: &Path) -> u64 {
        self.offsets.get(path).copied().unwrap_or(0)
    }

    /// Read complete lines appended since the last call.
    ///
    /// # Imperative Shell
    /// Performs file I/O. Updates internal offset state.
    pub fn read_new_lines(&mut self, path: &Path) -> io::Result<TailRead> {
        let mut file = File::open(path)?;
        let stored = self.offset(path);
        let file_len = file.metadata()?.len();

        let truncated = file_len < stored;
        let start = if truncated { 0 } else { stored };

        file.seek(SeekFrom::Start(start))?;
        let mut buf = Vec::new();
        file.read_to_end(&mut buf)?;

        let complete = match buf.iter().rposition(|b| *b == b'\n') {
            Some(last_newline) => last_newline + 1,
            None => 0,
        };
        buf.truncate(complete);

        self.offsets
            .insert(path.to_path_buf(), start + complete as u64);

        Ok(TailRead {
            content: String::from_utf8_lossy(&buf).into_owned(),
            truncated,
        })
    }
}
