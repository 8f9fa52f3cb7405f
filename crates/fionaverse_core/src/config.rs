//! Store configuration.
//!
//! # Responsibility
//! - Describe where slot data lives and how much of it may be stored.
//! - Build the matching storage backend.
//!
//! # Invariants
//! - `db_path = None` means an in-memory backend; nothing survives the process.
//! - `quota_bytes = None` disables the size limit.

use crate::db::DbResult;
use crate::logging::default_log_level;
use crate::store::backend::{MemoryBackend, StorageBackend};
use crate::store::sqlite_backend::SqliteBackend;
use serde::Deserialize;
use std::path::PathBuf;
use std::rc::Rc;

/// Browser local storage allows roughly 5 MiB per origin.
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

/// Runtime configuration for a portfolio store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// SQLite database file. `None` keeps everything in memory.
    pub db_path: Option<PathBuf>,
    /// Upper bound for the summed size of stored values.
    pub quota_bytes: Option<usize>,
    /// `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute directory for rolling log files. `None` leaves logging off.
    pub log_dir: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            quota_bytes: Some(DEFAULT_QUOTA_BYTES),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl StoreConfig {
    /// Parses a JSON configuration document; absent fields keep their defaults.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Opens the backend described by `config`.
pub fn open_backend(config: &StoreConfig) -> DbResult<Rc<dyn StorageBackend>> {
    let backend: Rc<dyn StorageBackend> = match config.db_path.as_ref() {
        Some(path) => Rc::new(SqliteBackend::open(path, config.quota_bytes)?),
        None => Rc::new(MemoryBackend::with_quota(config.quota_bytes)),
    };
    Ok(backend)
}

#[cfg(test)]
mod tests {
    use super::{open_backend, StoreConfig, DEFAULT_QUOTA_BYTES};
    use crate::store::backend::StorageBackend;
    use std::path::PathBuf;

    #[test]
    fn default_is_in_memory_with_browser_quota() {
        let config = StoreConfig::default();
        assert_eq!(config.db_path, None);
        assert_eq!(config.quota_bytes, Some(DEFAULT_QUOTA_BYTES));
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn from_json_fills_missing_fields_with_defaults() {
        let config =
            StoreConfig::from_json(r#"{"db_path": "/tmp/site.sqlite3", "quota_bytes": null}"#)
                .unwrap();
        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/site.sqlite3")));
        assert_eq!(config.quota_bytes, None);
        assert_eq!(config.log_level, StoreConfig::default().log_level);
    }

    #[test]
    fn open_backend_uses_file_when_path_is_set() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig {
            db_path: Some(dir.path().join("site.sqlite3")),
            ..StoreConfig::default()
        };

        let backend = open_backend(&config).unwrap();
        backend.write("bio", "\"hello\"").unwrap();
        assert_eq!(backend.read("bio").unwrap().as_deref(), Some("\"hello\""));
        assert!(dir.path().join("site.sqlite3").exists());
    }
}
