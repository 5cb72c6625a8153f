//! Local persistence of the conversation map.
//!
//! The whole map is stored as one JSON blob under a single namespaced key in
//! a small SQLite kv table.  There is deliberately no migration or versioning
//! scheme: a blob the current code cannot decode is treated as an empty
//! cache, never as an error.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};

use doctalk_shared::constants::CACHE_KEY;

use crate::error::{Result, StoreError};
use crate::models::ConversationMap;

/// Wrapper around a [`rusqlite::Connection`] holding the cached chat state.
pub struct ConversationCache {
    conn: Connection,
}

impl ConversationCache {
    /// Open (or create) the default cache database in the platform data
    /// directory.
    pub fn new() -> Result<Self> {
        let project_dirs =
            ProjectDirs::from("com", "doctalk", "doctalk").ok_or(StoreError::NoDataDir)?;

        let data_dir = project_dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;

        let db_path = data_dir.join("doctalk.db");

        tracing::info!(path = %db_path.display(), "opening conversation cache");

        Self::open_at(&db_path)
    }

    /// Open (or create) a cache at an explicit path.
    ///
    /// Useful for tests and custom directory layouts.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                json TEXT NOT NULL
            );",
        )?;

        Ok(Self { conn })
    }

    /// Persist a snapshot of the whole conversation map.
    pub fn save(&self, snapshot: &ConversationMap) -> Result<()> {
        let json = serde_json::to_string(snapshot)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, json) VALUES (?1, ?2)",
            params![CACHE_KEY, json],
        )?;
        Ok(())
    }

    /// Load the persisted conversation map.
    ///
    /// Returns `None` when nothing was persisted yet or the blob no longer
    /// decodes (empty-cache start state).
    pub fn load(&self) -> Result<Option<ConversationMap>> {
        let json: Option<String> = self
            .conn
            .query_row("SELECT json FROM kv WHERE key = ?1", params![CACHE_KEY], |row| {
                row.get(0)
            })
            .optional()?;

        let Some(json) = json else {
            return Ok(None);
        };

        match serde_json::from_str(&json) {
            Ok(map) => Ok(Some(map)),
            Err(e) => {
                tracing::warn!(error = %e, "discarding undecodable conversation cache");
                Ok(None)
            }
        }
    }

    /// Drop the persisted blob (pairs with the store's `clear_all`).
    pub fn clear(&self) -> Result<()> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![CACHE_KEY])?;
        Ok(())
    }

    /// Filesystem path of the open database (if any).
    pub fn path(&self) -> Option<PathBuf> {
        self.conn.path().map(PathBuf::from)
    }
}
