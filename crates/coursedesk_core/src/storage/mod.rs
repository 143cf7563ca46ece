//! Key-value persistence contract shared by every catalog store.
//!
//! # Responsibility
//! - Define the `load(key)` / `save(key, value)` seam stores are built on.
//! - Encode and decode whole collections as JSON arrays, one slot each.
//!
//! # Invariants
//! - Reads fail soft: a missing, unreadable or corrupt slot is an empty
//!   collection and the failure is only logged.
//! - Writes replace the full slot; there are no partial or append writes.
//! - Save failures are logged and reported as `false`, never propagated.

use crate::db::DbError;
use log::{error, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory;
pub mod sqlite;

pub type StorageResult<T> = Result<T, StorageError>;

/// Backend failure while reading or writing one slot.
#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
    /// Backend refused the write (quota, read-only mode).
    Rejected(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Rejected(reason) => write!(f, "storage rejected write: {reason}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Rejected(_) => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Process-wide named slots holding serialized collections.
pub trait KeyValueStore {
    /// Returns the raw slot value, or `None` when the slot was never written.
    fn load(&self, key: &str) -> StorageResult<Option<String>>;
    /// Overwrites the slot with `value`.
    fn save(&self, key: &str, value: &str) -> StorageResult<()>;
}

/// Loads and decodes one collection slot.
///
/// Never fails: backend errors and malformed JSON yield an empty collection.
pub fn load_collection<T, S>(kv: &S, key: &str) -> Vec<T>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let raw = match kv.load(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(err) => {
            error!(
                "event=slot_load module=storage status=error slot={key} error_code=backend_read_failed error={err}"
            );
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<T>>(&raw) {
        Ok(items) => items,
        Err(err) => {
            warn!(
                "event=slot_load module=storage status=error slot={key} error_code=slot_corrupt bytes={} error={err}",
                raw.len()
            );
            Vec::new()
        }
    }
}

/// Encodes and writes one full collection slot.
///
/// Returns whether the write reached the backend.
pub fn save_collection<T, S>(kv: &S, key: &str, items: &[T]) -> bool
where
    T: Serialize,
    S: KeyValueStore + ?Sized,
{
    let encoded = match serde_json::to_string(items) {
        Ok(encoded) => encoded,
        Err(err) => {
            error!(
                "event=slot_save module=storage status=error slot={key} error_code=encode_failed error={err}"
            );
            return false;
        }
    };

    match kv.save(key, &encoded) {
        Ok(()) => true,
        Err(err) => {
            error!(
                "event=slot_save module=storage status=error slot={key} items={} error_code=backend_write_failed error={err}",
                items.len()
            );
            false
        }
    }
}
