//! Durable key-value storage backing the search history.

use rusqlite::{params, Connection, OptionalExtension};
use skycast_core::{RusqliteErrorExt, StorageError};
use std::path::Path;

/// String key-value store.
///
/// Implementations don't need to be Sync; the orchestrator serializes access.
pub trait KeyValueStore: Send {
    /// Value stored under `key`, if any
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// SQLite-backed key-value store.
pub struct SqliteKeyValueStore {
    conn: Connection,
}

impl SqliteKeyValueStore {
    /// Open or create the store at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StorageError::OpenFailed(format!("{}: {}", parent.display(), e)))?;
        }

        let conn = Connection::open(path).map_err(RusqliteErrorExt::into_storage_error)?;
        let store = Self { conn };
        store.init_schema()?;
        tracing::debug!("Opened key-value store at {}", path.display());
        Ok(store)
    }

    /// Create an in-memory store (nothing survives the process).
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(RusqliteErrorExt::into_storage_error)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Open the store at `path`, falling back to an in-memory store when the
    /// file can't be opened or isn't a usable database.
    ///
    /// Lookups still work in that case; the history just doesn't persist.
    pub fn open_or_memory<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path = path.as_ref();
        match Self::open(path) {
            Ok(store) => Ok(store),
            Err(e) => {
                tracing::warn!(
                    "History at {} is unusable ({}), keeping history in memory",
                    path.display(),
                    e
                );
                Self::in_memory()
            }
        }
    }

    fn init_schema(&self) -> Result<(), StorageError> {
        self.conn
            .execute_batch(
                r#"
                CREATE TABLE IF NOT EXISTS kv (
                    key TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );
                "#,
            )
            .map_err(RusqliteErrorExt::into_storage_error)
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(RusqliteErrorExt::into_storage_error)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
                params![key, value],
            )
            .map_err(RusqliteErrorExt::into_storage_error)?;
        Ok(())
    }
}
