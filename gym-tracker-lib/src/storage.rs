//src/storage.rs
use crate::model::{LogEntry, WorkoutDay};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

pub const LOGS_KEY: &str = "gymLogs";
pub const WEEK1_KEY: &str = "gymWeek1";
pub const WEEK2_KEY: &str = "gymWeek2";

const DB_FILE_NAME: &str = "gym-tracker.sqlite";
const APP_DATA_DIR: &str = "gym-tracker";
const DB_PATH_ENV_VAR: &str = "GYM_TRACKER_DB_PATH";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection failed")]
    Connection(#[from] rusqlite::Error),
    #[error("Failed to get application data directory")]
    DataDir,
    #[error("I/O error accessing database file")]
    Io(#[from] std::io::Error),
    #[error("Database query failed: {0}")]
    QueryFailed(rusqlite::Error),
    #[error("Database write failed: {0}")]
    WriteFailed(rusqlite::Error),
    #[error("Failed to encode value for key '{key}': {source}")]
    Encode {
        key: String,
        source: serde_json::Error,
    },
}

/// An opaque string-to-string store, standing in for browser local storage.
pub trait KeyValueStore {
    /// # Errors
    /// Backend failures.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    /// # Errors
    /// Backend failures.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Gets the path to the SQLite file within the app's data directory.
/// `GYM_TRACKER_DB_PATH` overrides it.
pub fn get_db_path() -> Result<PathBuf, StorageError> {
    if let Ok(path) = std::env::var(DB_PATH_ENV_VAR) {
        let path = PathBuf::from(path);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        return Ok(path);
    }
    let data_dir = dirs::data_dir().ok_or(StorageError::DataDir)?;
    let app_dir = data_dir.join(APP_DATA_DIR);
    if !app_dir.exists() {
        std::fs::create_dir_all(&app_dir)?;
    }
    Ok(app_dir.join(DB_FILE_NAME))
}

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (creating if needed) the store at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(StorageError::Connection)?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(StorageError::Connection)?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, StorageError> {
        init_db(&conn)?;
        Ok(Self { conn })
    }
}

/// Initializes the key-value table if it doesn't exist.
pub fn init_db(conn: &Connection) -> Result<(), StorageError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS kv_store (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL
        )",
        [],
    )
    .map_err(StorageError::Connection)?;
    Ok(())
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(StorageError::QueryFailed)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn
            .execute(
                "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )
            .map_err(StorageError::WriteFailed)?;
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Serializes `value` as JSON and writes it under `key`.
pub fn save_json<T: Serialize + ?Sized>(
    store: &mut dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let text = serde_json::to_string(value).map_err(|source| StorageError::Encode {
        key: key.to_string(),
        source,
    })?;
    debug!(key, bytes = text.len(), "persisting");
    store.set(key, &text)
}

/// Reads and decodes `key`, returning `fallback()` when the key is absent,
/// unreadable or holds malformed JSON.
pub fn load_json_or<T, F>(store: &dyn KeyValueStore, key: &str, fallback: F) -> T
where
    T: DeserializeOwned,
    F: FnOnce() -> T,
{
    let text = match store.get(key) {
        Ok(Some(text)) => text,
        Ok(None) => return fallback(),
        Err(e) => {
            warn!(key, error = %e, "failed to read stored value, using default");
            return fallback();
        }
    };
    match serde_json::from_str(&text) {
        Ok(value) => value,
        Err(e) => {
            warn!(key, error = %e, "stored value is malformed, using default");
            fallback()
        }
    }
}

pub fn save_logs(store: &mut dyn KeyValueStore, logs: &[LogEntry]) -> Result<(), StorageError> {
    save_json(store, LOGS_KEY, logs)
}

pub fn save_week(
    store: &mut dyn KeyValueStore,
    key: &str,
    days: &[WorkoutDay],
) -> Result<(), StorageError> {
    save_json(store, key, days)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_store_overwrites() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "one").unwrap();
        store.set("k", "two").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("two"));
        assert_eq!(store.get("other").unwrap(), None);
    }

    #[test]
    fn malformed_json_falls_back() {
        let mut store = MemoryStore::default();
        store.set(LOGS_KEY, "{not json").unwrap();
        let logs: Vec<LogEntry> = load_json_or(&store, LOGS_KEY, Vec::new);
        assert!(logs.is_empty());
    }

    #[test]
    fn sqlite_store_persists_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kv.sqlite");
        {
            let mut store = SqliteStore::open(&path).unwrap();
            store.set(WEEK1_KEY, "[]").unwrap();
        }
        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.get(WEEK1_KEY).unwrap().as_deref(), Some("[]"));
    }
}
