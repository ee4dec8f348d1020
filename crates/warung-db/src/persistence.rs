//! # Persistence Adapter
//!
//! Typed JSON documents on top of a [`StorageBackend`].
//!
//! ## Failure Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  load(key, default)                                                    │
//! │  ├── slot missing          → default()                                 │
//! │  ├── slot unparseable      → default()   (warn)                        │
//! │  └── backend read fails    → default()   (error)                       │
//! │      Never fails: the app always starts.                               │
//! │                                                                         │
//! │  save / remove / commit                                                │
//! │  └── any failure           → logged (error) and returned as DbError    │
//! │      The caller keeps its in-memory state and decides what to tell     │
//! │      the user.                                                         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::error::DbResult;
use crate::pool::Database;
use crate::storage::{MemoryStorage, SqliteStorage, StorageBackend, WriteOp};

/// Reads and writes JSON-encoded values under string keys.
///
/// Cloning is cheap; clones share the backend.
#[derive(Debug, Clone)]
pub struct Persistence {
    backend: Arc<dyn StorageBackend>,
}

impl Persistence {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Persistence { backend }
    }

    /// Slots in the database's `kv_store` table.
    pub fn sqlite(db: &Database) -> Self {
        Self::new(Arc::new(SqliteStorage::new(db)))
    }

    /// Slots that live only as long as the process.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Returns the value stored under `key`, or `default()` when the slot is
    /// missing, corrupt or unreadable.
    pub async fn load<T, F>(&self, key: &str, default: F) -> T
    where
        T: DeserializeOwned,
        F: FnOnce() -> T,
    {
        let raw = match self.backend.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %key, "Slot empty, using default");
                return default();
            }
            Err(e) => {
                error!(key = %key, error = %e, "Failed to read slot, using default");
                return default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(key = %key, error = %e, "Slot holds invalid JSON, using default");
                default()
            }
        }
    }

    /// Serializes `value` and writes it under `key`, replacing what was there.
    pub async fn save<T>(&self, key: &str, value: &T) -> DbResult<()>
    where
        T: Serialize + ?Sized,
    {
        let result = match serde_json::to_string(value) {
            Ok(json) => self.backend.put(key, &json).await,
            Err(e) => Err(e.into()),
        };

        if let Err(e) = &result {
            error!(key = %key, error = %e, "Failed to save slot");
        }
        result
    }

    /// Deletes the slot under `key`.
    pub async fn remove(&self, key: &str) -> DbResult<()> {
        let result = self.backend.delete(key).await;

        if let Err(e) = &result {
            error!(key = %key, error = %e, "Failed to remove slot");
        }
        result
    }

    /// Writes every operation in `batch` together.
    pub async fn commit(&self, batch: WriteBatch) -> DbResult<()> {
        if batch.is_empty() {
            return Ok(());
        }

        let keys: Vec<String> = batch.ops.iter().map(|op| op.key().to_string()).collect();
        let result = self.backend.write_batch(batch.ops).await;

        if let Err(e) = &result {
            error!(keys = ?keys, error = %e, "Failed to commit slot batch");
        }
        result
    }
}

/// Several slot writes committed together by [`Persistence::commit`].
///
/// ```rust,ignore
/// let batch = WriteBatch::new()
///     .save(PRODUCTS_KEY, &products)?
///     .save(SALES_KEY, &sales)?;
/// persistence.commit(batch).await?;
/// ```
#[derive(Debug, Default)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `value` (as JSON) under `key`.
    pub fn save<T>(mut self, key: &str, value: &T) -> DbResult<Self>
    where
        T: Serialize + ?Sized,
    {
        let json = serde_json::to_string(value)?;
        self.ops.push(WriteOp::put(key, json));
        Ok(self)
    }

    /// Queues removal of `key`.
    pub fn remove(mut self, key: &str) -> Self {
        self.ops.push(WriteOp::delete(key));
        self
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
