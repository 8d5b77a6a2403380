use std::fs;
use std::io;
use std::path::PathBuf;

use super::StoreResult;
use crate::error::StoreError;
use crate::model::ThreadId;

/// Ordered list of thread ids this client has opened, oldest first.
pub trait ThreadHistory {
    fn read_list(&self) -> StoreResult<Vec<ThreadId>>;

    /// Append unless already present.
    fn append(&mut self, thread_id: &ThreadId) -> StoreResult<()>;

    fn remove(&mut self, thread_id: &ThreadId) -> StoreResult<()>;
}

/// History kept as a JSON array in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileHistory {
    path: PathBuf,
}

impl JsonFileHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn write(&self, ids: &[ThreadId]) -> StoreResult<()> {
        let content = serde_json::to_string_pretty(ids)?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.display().to_string(),
                source,
            })?;
        }
        fs::write(&self.path, content).map_err(|source| StoreError::Io {
            path: self.path.display().to_string(),
            source,
        })
    }
}

impl ThreadHistory for JsonFileHistory {
    fn read_list(&self) -> StoreResult<Vec<ThreadId>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.display().to_string(),
                    source,
                })
            }
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        // Raw strings so one blank entry does not poison the whole file.
        let raw: Vec<String> = serde_json::from_str(&content)?;
        Ok(raw.into_iter().filter_map(ThreadId::try_new).collect())
    }

    fn append(&mut self, thread_id: &ThreadId) -> StoreResult<()> {
        let mut ids = self.read_list()?;
        if ids.contains(thread_id) {
            return Ok(());
        }
        ids.push(thread_id.clone());
        self.write(&ids)
    }

    fn remove(&mut self, thread_id: &ThreadId) -> StoreResult<()> {
        let mut ids = self.read_list()?;
        let before = ids.len();
        ids.retain(|id| id != thread_id);
        if ids.len() == before {
            return Ok(());
        }
        self.write(&ids)
    }
}

/// In-process history, for tests and ephemeral sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryHistory {
    ids: Vec<ThreadId>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ThreadHistory for MemoryHistory {
    fn read_list(&self) -> StoreResult<Vec<ThreadId>> {
        Ok(self.ids.clone())
    }

    fn append(&mut self, thread_id: &ThreadId) -> StoreResult<()> {
        if !self.ids.contains(thread_id) {
            self.ids.push(thread_id.clone());
        }
        Ok(())
    }

    fn remove(&mut self, thread_id: &ThreadId) -> StoreResult<()> {
        self.ids.retain(|id| id != thread_id);
        Ok(())
    }
}
