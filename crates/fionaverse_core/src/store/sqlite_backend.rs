//! SQLite-backed durable storage for slots.
//!
//! # Responsibility
//! - Persist slot text in the `kv_entries` table.
//! - Enforce the optional byte quota before every write.
//!
//! # Invariants
//! - One row per key; writes are upserts.
//! - `value_bytes` always mirrors the UTF-8 length of `value`.

use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::store::backend::{BackendError, BackendResult, StorageBackend};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Key/value table on top of one SQLite connection.
pub struct SqliteBackend {
    conn: Connection,
    quota_bytes: Option<usize>,
}

impl SqliteBackend {
    /// Opens or creates the database file at `path`.
    pub fn open(path: impl AsRef<Path>, quota_bytes: Option<usize>) -> DbResult<Self> {
        Ok(Self::from_connection(open_db(path)?, quota_bytes))
    }

    pub fn open_in_memory(quota_bytes: Option<usize>) -> DbResult<Self> {
        Ok(Self::from_connection(open_db_in_memory()?, quota_bytes))
    }

    /// Wraps an already migrated connection.
    pub fn from_connection(conn: Connection, quota_bytes: Option<usize>) -> Self {
        Self { conn, quota_bytes }
    }

    /// Summed byte length of all stored values.
    pub fn used_bytes(&self) -> BackendResult<usize> {
        let used: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(value_bytes), 0) FROM kv_entries;",
            [],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(used).unwrap_or(0))
    }

    /// Stored keys in lexical order.
    pub fn keys(&self) -> BackendResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM kv_entries ORDER BY key ASC;")?;
        let keys = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(keys)
    }

    fn check_quota(&self, key: &str, value: &str) -> BackendResult<()> {
        let Some(quota_bytes) = self.quota_bytes else {
            return Ok(());
        };

        let others: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(value_bytes), 0) FROM kv_entries WHERE key <> ?1;",
            [key],
            |row| row.get(0),
        )?;
        let required_bytes = usize::try_from(others).unwrap_or(0) + value.len();
        if required_bytes > quota_bytes {
            return Err(BackendError::QuotaExceeded {
                key: key.to_string(),
                required_bytes,
                quota_bytes,
            });
        }
        Ok(())
    }
}

impl StorageBackend for SqliteBackend {
    fn read(&self, key: &str) -> BackendResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write(&self, key: &str, value: &str) -> BackendResult<()> {
        self.check_quota(key, value)?;

        let value_bytes = i64::try_from(value.len()).map_err(|_| {
            BackendError::Unavailable(format!("value for `{key}` is too large to store"))
        })?;
        self.conn.execute(
            "INSERT INTO kv_entries (key, value, value_bytes, updated_at)
             VALUES (?1, ?2, ?3, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                value_bytes = excluded.value_bytes,
                updated_at = excluded.updated_at;",
            params![key, value, value_bytes],
        )?;

        debug!(
            "event=kv_write module=store status=ok key={} value_bytes={}",
            key, value_bytes
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::SqliteBackend;
    use crate::store::backend::{BackendError, StorageBackend};

    #[test]
    fn write_then_read_roundtrip() {
        let backend = SqliteBackend::open_in_memory(None).unwrap();
        assert!(backend.read("bio").unwrap().is_none());

        backend.write("bio", "\"hello\"").unwrap();
        backend.write("bio", "\"hello again\"").unwrap();

        assert_eq!(
            backend.read("bio").unwrap().as_deref(),
            Some("\"hello again\"")
        );
        assert_eq!(backend.keys().unwrap(), vec!["bio".to_string()]);
        assert_eq!(backend.used_bytes().unwrap(), "\"hello again\"".len());
    }

    #[test]
    fn quota_rejects_growth_and_keeps_old_row() {
        let backend = SqliteBackend::open_in_memory(Some(8)).unwrap();
        backend.write("a", "1234").unwrap();
        backend.write("b", "1234").unwrap();

        let err = backend.write("b", "12345").unwrap_err();
        assert!(matches!(
            err,
            BackendError::QuotaExceeded {
                required_bytes: 9,
                quota_bytes: 8,
                ..
            }
        ));
        assert_eq!(backend.read("b").unwrap().as_deref(), Some("1234"));
    }

    #[test]
    fn empty_key_is_rejected_by_schema() {
        let backend = SqliteBackend::open_in_memory(None).unwrap();
        assert!(matches!(
            backend.write("", "1").unwrap_err(),
            BackendError::Db(_)
        ));
    }
}
