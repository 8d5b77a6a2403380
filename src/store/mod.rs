//! Thread metadata persistence and the local thread-history port.

mod history;
mod sqlite;

pub use history::{JsonFileHistory, MemoryHistory, ThreadHistory};
pub use sqlite::SqliteThreadStore;

use crate::error::StoreError;
use crate::model::{ThreadId, ThreadRecord};

pub type StoreResult<T> = Result<T, StoreError>;

/// CRUD surface over the thread table.
///
/// `soft_delete` and `touch_last_accessed` acknowledge unknown ids; the
/// returned count says how many rows actually changed.
pub trait ThreadStore {
    fn create(&self, thread_id: &ThreadId, title: Option<String>) -> StoreResult<ThreadRecord>;

    fn get(&self, thread_id: &ThreadId) -> StoreResult<Option<ThreadRecord>>;

    /// Live threads, most recently accessed first.
    fn list(&self) -> StoreResult<Vec<ThreadRecord>>;

    fn soft_delete(&self, thread_id: &ThreadId) -> StoreResult<usize>;

    fn touch_last_accessed(&self, thread_id: &ThreadId) -> StoreResult<usize>;
}
