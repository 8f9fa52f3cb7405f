//! Storage backend contract and the in-memory implementation.
//!
//! # Responsibility
//! - Define the key→string get/set surface every slot persists through.
//! - Provide a quota-aware in-memory map for tests and ephemeral stores.
//!
//! # Invariants
//! - Backends never interpret stored text.
//! - Writes that would exceed the quota are rejected and leave the
//!   previous value in place.

use crate::db::DbError;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type BackendResult<T> = Result<T, BackendError>;

/// Failure reported by a storage backend.
#[derive(Debug)]
pub enum BackendError {
    /// The write would push stored bytes past the configured quota.
    QuotaExceeded {
        key: String,
        required_bytes: usize,
        quota_bytes: usize,
    },
    /// The backend refused the write for a reason of its own.
    Unavailable(String),
    Db(DbError),
}

impl Display for BackendError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::QuotaExceeded {
                key,
                required_bytes,
                quota_bytes,
            } => write!(
                f,
                "storage quota exceeded writing `{key}`: {required_bytes} bytes needed, {quota_bytes} allowed"
            ),
            Self::Unavailable(message) => write!(f, "storage unavailable: {message}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BackendError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for BackendError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for BackendError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable key→string store shared by every slot of an application.
///
/// Methods take `&self`; implementations use interior mutability and are
/// only ever driven from one thread.
pub trait StorageBackend {
    /// Returns the stored text, or `None` when the key was never written.
    fn read(&self, key: &str) -> BackendResult<Option<String>>;
    /// Stores `value` under `key`, replacing any previous text.
    fn write(&self, key: &str, value: &str) -> BackendResult<()>;
}

/// In-memory backend with an optional byte quota.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RefCell<HashMap<String, String>>,
    quota_bytes: Option<usize>,
    reject_writes: Cell<bool>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota_bytes: Option<usize>) -> Self {
        Self {
            quota_bytes,
            ..Self::default()
        }
    }

    /// Seeds raw text without quota checks, e.g. to simulate stale or
    /// hand-edited storage.
    pub fn insert_raw(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.borrow_mut().insert(key.into(), value.into());
    }

    /// While set, every write fails with `BackendError::Unavailable`.
    pub fn set_reject_writes(&self, reject: bool) {
        self.reject_writes.set(reject);
    }

    /// Summed byte length of all stored values.
    pub fn used_bytes(&self) -> usize {
        self.entries.borrow().values().map(String::len).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self, key: &str) -> BackendResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> BackendResult<()> {
        if self.reject_writes.get() {
            return Err(BackendError::Unavailable(format!(
                "writes are disabled (key `{key}`)"
            )));
        }

        let mut entries = self.entries.borrow_mut();
        if let Some(quota_bytes) = self.quota_bytes {
            let previous = entries.get(key).map_or(0, String::len);
            let used: usize = entries.values().map(String::len).sum();
            let required_bytes = used - previous + value.len();
            if required_bytes > quota_bytes {
                return Err(BackendError::QuotaExceeded {
                    key: key.to_string(),
                    required_bytes,
                    quota_bytes,
                });
            }
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{BackendError, MemoryBackend, StorageBackend};

    #[test]
    fn read_missing_key_is_none() {
        let backend = MemoryBackend::new();
        assert!(backend.read("theme").unwrap().is_none());
        assert!(backend.is_empty());
    }

    #[test]
    fn write_replaces_previous_value() {
        let backend = MemoryBackend::new();
        backend.write("theme", "\"dark\"").unwrap();
        backend.write("theme", "\"aurora\"").unwrap();
        assert_eq!(backend.read("theme").unwrap().as_deref(), Some("\"aurora\""));
        assert_eq!(backend.len(), 1);
    }

    #[test]
    fn quota_counts_replacement_not_addition() {
        let backend = MemoryBackend::with_quota(Some(10));
        backend.write("a", "12345678").unwrap();
        backend.write("a", "1234567890").unwrap();

        let err = backend.write("b", "1").unwrap_err();
        assert!(matches!(
            err,
            BackendError::QuotaExceeded {
                required_bytes: 11,
                quota_bytes: 10,
                ..
            }
        ));
        assert_eq!(backend.used_bytes(), 10);
        assert!(backend.read("b").unwrap().is_none());
    }

    #[test]
    fn rejected_writes_keep_previous_value() {
        let backend = MemoryBackend::new();
        backend.write("bio", "\"old\"").unwrap();
        backend.set_reject_writes(true);

        assert!(backend.write("bio", "\"new\"").is_err());
        assert_eq!(backend.read("bio").unwrap().as_deref(), Some("\"old\""));

        backend.set_reject_writes(false);
        backend.write("bio", "\"new\"").unwrap();
        assert_eq!(backend.read("bio").unwrap().as_deref(), Some("\"new\""));
    }
}
