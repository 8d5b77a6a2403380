use std::path::Path;

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::{StoreResult, ThreadStore};
use crate::error::StoreError;
use crate::model::{ThreadId, ThreadRecord};

/// Schema migrations, applied in order on open. Each must be idempotent.
const MIGRATIONS: &[(&str, &str)] = &[(
    "001_user_threads",
    r#"
    CREATE TABLE IF NOT EXISTS user_threads (
        thread_id        TEXT PRIMARY KEY NOT NULL,
        title            TEXT NOT NULL,
        created_at       TEXT NOT NULL,
        last_accessed_at TEXT NOT NULL,
        is_deleted       INTEGER NOT NULL DEFAULT 0
    );
    CREATE INDEX IF NOT EXISTS idx_user_threads_last_accessed
        ON user_threads (last_accessed_at DESC);
    "#,
)];

/// [`ThreadStore`] over a single SQLite table.
pub struct SqliteThreadStore {
    conn: Connection,
}

impl SqliteThreadStore {
    /// Open (or create) the database file and run migrations.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.display().to_string(),
                source,
            })?;
        }
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> StoreResult<Self> {
        let store = Self { conn };
        store.run_migrations()?;
        Ok(store)
    }

    fn run_migrations(&self) -> StoreResult<()> {
        for (name, sql) in MIGRATIONS {
            tracing::debug!(migration = *name, "running migration");
            self.conn.execute_batch(sql)?;
        }
        Ok(())
    }

    fn touch_at(&self, thread_id: &ThreadId, at: DateTime<Utc>) -> StoreResult<usize> {
        let changed = self.conn.execute(
            "UPDATE user_threads SET last_accessed_at = ?1 WHERE thread_id = ?2",
            params![format_timestamp(at), thread_id.as_str()],
        )?;
        Ok(changed)
    }
}

impl ThreadStore for SqliteThreadStore {
    fn create(&self, thread_id: &ThreadId, title: Option<String>) -> StoreResult<ThreadRecord> {
        if thread_id.as_str().trim().is_empty() {
            return Err(StoreError::MissingThreadId);
        }

        let record = ThreadRecord::new(thread_id.clone(), title, Utc::now().trunc_subsecs(6));
        let inserted = self.conn.execute(
            r#"
            INSERT OR IGNORE INTO user_threads (thread_id, title, created_at, last_accessed_at, is_deleted)
            VALUES (?1, ?2, ?3, ?4, 0)
            "#,
            params![
                record.thread_id.as_str(),
                record.title,
                format_timestamp(record.created_at),
                format_timestamp(record.last_accessed_at),
            ],
        )?;

        if inserted == 0 {
            return Err(StoreError::Duplicate(thread_id.to_string()));
        }

        tracing::info!(thread_id = %record.thread_id, title = %record.title, "created thread");
        Ok(record)
    }

    fn get(&self, thread_id: &ThreadId) -> StoreResult<Option<ThreadRecord>> {
        let row = self
            .conn
            .query_row(
                r#"
                SELECT thread_id, title, created_at, last_accessed_at, is_deleted
                FROM user_threads
                WHERE thread_id = ?1
                "#,
                params![thread_id.as_str()],
                ThreadRow::from_row,
            )
            .optional()?;

        row.map(ThreadRow::into_record).transpose()
    }

    fn list(&self) -> StoreResult<Vec<ThreadRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT thread_id, title, created_at, last_accessed_at, is_deleted
            FROM user_threads
            WHERE is_deleted = 0 AND thread_id <> ''
            ORDER BY last_accessed_at DESC
            "#,
        )?;

        let rows = stmt.query_map([], ThreadRow::from_row)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?.into_record()?);
        }
        Ok(records)
    }

    fn soft_delete(&self, thread_id: &ThreadId) -> StoreResult<usize> {
        let changed = self.conn.execute(
            "UPDATE user_threads SET is_deleted = 1 WHERE thread_id = ?1",
            params![thread_id.as_str()],
        )?;
        if changed == 0 {
            tracing::warn!(thread_id = %thread_id, "soft delete matched no thread");
        } else {
            tracing::info!(thread_id = %thread_id, "soft-deleted thread");
        }
        Ok(changed)
    }

    fn touch_last_accessed(&self, thread_id: &ThreadId) -> StoreResult<usize> {
        let changed = self.touch_at(thread_id, Utc::now())?;
        tracing::debug!(thread_id = %thread_id, changed, "touched thread");
        Ok(changed)
    }
}

/// Raw row as stored; timestamps are parsed in `into_record`.
struct ThreadRow {
    thread_id: String,
    title: String,
    created_at: String,
    last_accessed_at: String,
    is_deleted: bool,
}

impl ThreadRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            thread_id: row.get(0)?,
            title: row.get(1)?,
            created_at: row.get(2)?,
            last_accessed_at: row.get(3)?,
            is_deleted: row.get(4)?,
        })
    }

    fn into_record(self) -> StoreResult<ThreadRecord> {
        let thread_id = ThreadId::try_new(self.thread_id).ok_or(StoreError::MissingThreadId)?;
        Ok(ThreadRecord {
            thread_id,
            title: self.title,
            created_at: parse_timestamp(&self.created_at)?,
            last_accessed_at: parse_timestamp(&self.last_accessed_at)?,
            is_deleted: self.is_deleted,
        })
    }
}

/// Fixed-width UTC form so `ORDER BY` on the text column sorts chronologically.
fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(value: &str) -> StoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Timestamp {
            value: value.to_string(),
            reason: e.to_string(),
        })
}
