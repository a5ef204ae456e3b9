//! SQLite-backed key-value store.
//!
//! # Invariants
//! - Values are written with upsert semantics; the last write wins.
//! - Trait methods log failures at `warn` and never propagate them.

use super::PersistentStore;
use crate::db::{open_db, open_db_in_memory, DbError, DbResult};
use log::warn;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Local store persisted in a single SQLite file.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (or creates) the store file and applies migrations.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Ok(Self::from_connection(open_db(path)?))
    }

    /// Opens a throwaway store that lives as long as this value.
    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self::from_connection(open_db_in_memory()?))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Reads one value, surfacing storage errors.
    pub fn try_load(&self, key: &str) -> DbResult<Option<String>> {
        let conn = self.lock()?;
        let value = conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Upserts one value, surfacing storage errors.
    pub fn try_save(&self, key: &str, value: &str) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO kv_store (key, value)
             VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }

    /// Deletes one value, surfacing storage errors. Missing keys are not an error.
    pub fn try_remove(&self, key: &str) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM kv_store WHERE key = ?1;", [key])?;
        Ok(())
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| DbError::LockPoisoned)
    }
}

impl PersistentStore for SqliteStore {
    fn load(&self, key: &str) -> Option<String> {
        match self.try_load(key) {
            Ok(value) => value,
            Err(err) => {
                warn!("event=store_load module=store status=error store=sqlite error={err}");
                None
            }
        }
    }

    fn save(&self, key: &str, value: &str) {
        if let Err(err) = self.try_save(key, value) {
            warn!(
                "event=store_save module=store status=error store=sqlite bytes={} error={err}",
                value.len()
            );
        }
    }

    fn remove(&self, key: &str) {
        if let Err(err) = self.try_remove(key) {
            warn!("event=store_remove module=store status=error store=sqlite error={err}");
        }
    }
}
