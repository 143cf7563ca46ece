//! Durable slot backend over SQLite.
//!
//! # Invariants
//! - One row per slot in `kv_slots`; `save` upserts the whole value.
//! - The connection must come from `db::open_db*` so migrations are applied.

use super::{KeyValueStore, StorageResult};
use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};

/// SQLite-backed key-value store borrowing an open connection.
pub struct SqliteKeyValueStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKeyValueStore<'conn> {
    /// Wraps a migrated connection.
    ///
    /// # Errors
    /// - `SchemaNotMigrated` when the connection skipped `open_db`.
    pub fn try_new(conn: &'conn Connection) -> StorageResult<Self> {
        let db_version = current_user_version(conn)?;
        let required = latest_version();
        if db_version < required {
            return Err(DbError::SchemaNotMigrated {
                db_version,
                required,
            }
            .into());
        }
        Ok(Self { conn })
    }

    /// Names of all written slots, sorted.
    pub fn keys(&self) -> StorageResult<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT key FROM kv_slots ORDER BY key ASC;")?;
        let mut rows = stmt.query([])?;
        let mut keys = Vec::new();
        while let Some(row) = rows.next()? {
            keys.push(row.get(0)?);
        }
        Ok(keys)
    }
}

impl KeyValueStore for SqliteKeyValueStore<'_> {
    fn load(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_slots WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn save(&self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO kv_slots (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }
}
