//! SQLite-backed snapshot store.
//!
//! Wraps a single rusqlite Connection in a Mutex for thread-safe access.
//! Configures WAL mode on initialization. Read/write failures after open are
//! logged and treated as absence, per the `SnapshotStore` contract.

use std::path::Path;
use std::sync::Mutex;

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use tracing::{info, warn};

use jeongi_core::error::JeongiError;

use crate::store::SnapshotStore;

/// A `SnapshotStore` persisted to a SQLite database file.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a store at the given path.
    ///
    /// Configures WAL mode and creates the snapshot table if needed.
    pub fn open(path: &Path) -> Result<Self, JeongiError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)
            .map_err(|e| JeongiError::Storage(format!("Failed to open database: {}", e)))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )
        .map_err(|e| JeongiError::Storage(format!("Failed to set pragmas: {}", e)))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS snapshots (
                 key TEXT PRIMARY KEY,
                 value TEXT NOT NULL,
                 updated_at INTEGER NOT NULL
             )",
            [],
        )
        .map_err(|e| JeongiError::Storage(format!("Failed to create snapshot table: {}", e)))?;

        info!("Snapshot store opened at {}", path.display());

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> rusqlite::Result<T>) -> Option<T> {
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        match f(&conn) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Snapshot store operation failed: {}", e);
                None
            }
        }
    }
}

impl SnapshotStore for SqliteStore {
    fn get(&self, key: &str) -> Option<String> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT value FROM snapshots WHERE key = ?1",
                rusqlite::params![key],
                |row| row.get(0),
            )
            .optional()
        })
        .flatten()
    }

    fn set(&self, key: &str, value: &str) {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO snapshots (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = ?3",
                rusqlite::params![key, value, Utc::now().timestamp()],
            )
        });
    }

    fn remove(&self, key: &str) {
        self.with_conn(|conn| {
            conn.execute(
                "DELETE FROM snapshots WHERE key = ?1",
                rusqlite::params![key],
            )
        });
    }
}
