//! # Storage Backends
//!
//! The seam between [`Persistence`](crate::Persistence) and the medium the
//! slots live in.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Persistence ──► Arc<dyn StorageBackend>                               │
//! │                        │                                                │
//! │                        ├── SqliteStorage  (kv_store table, durable)    │
//! │                        └── MemoryStorage  (HashMap, tests/ephemeral)   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{DbError, DbResult};
use crate::pool::Database;
use crate::repository::kv::KvRepository;

/// One write in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    Put { key: String, value: String },
    Delete { key: String },
}

impl WriteOp {
    pub fn put(key: impl Into<String>, value: impl Into<String>) -> Self {
        WriteOp::Put {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn delete(key: impl Into<String>) -> Self {
        WriteOp::Delete { key: key.into() }
    }

    pub fn key(&self) -> &str {
        match self {
            WriteOp::Put { key, .. } | WriteOp::Delete { key } => key,
        }
    }
}

/// A durable string-keyed store.
///
/// Implementations must be safe to share between tasks. `write_batch`
/// should be atomic where the medium allows it.
#[async_trait]
pub trait StorageBackend: Send + Sync + std::fmt::Debug {
    /// Human-readable backend name for logs.
    fn name(&self) -> &'static str;

    async fn get(&self, key: &str) -> DbResult<Option<String>>;

    async fn put(&self, key: &str, value: &str) -> DbResult<()>;

    /// Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> DbResult<()>;

    /// Applies `ops` in order.
    async fn write_batch(&self, ops: Vec<WriteOp>) -> DbResult<()> {
        for op in ops {
            match op {
                WriteOp::Put { key, value } => self.put(&key, &value).await?,
                WriteOp::Delete { key } => self.delete(&key).await?,
            }
        }
        Ok(())
    }
}

// =============================================================================
// SQLite
// =============================================================================

/// Slots in the SQLite `kv_store` table.
#[derive(Debug, Clone)]
pub struct SqliteStorage {
    kv: KvRepository,
}

impl SqliteStorage {
    pub fn new(db: &Database) -> Self {
        SqliteStorage { kv: db.kv() }
    }
}

#[async_trait]
impl StorageBackend for SqliteStorage {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn get(&self, key: &str) -> DbResult<Option<String>> {
        self.kv.get(key).await
    }

    async fn put(&self, key: &str, value: &str) -> DbResult<()> {
        self.kv.put(key, value).await
    }

    async fn delete(&self, key: &str) -> DbResult<()> {
        self.kv.delete(key).await.map(|_| ())
    }

    /// One transaction for the whole batch.
    async fn write_batch(&self, ops: Vec<WriteOp>) -> DbResult<()> {
        self.kv.apply(&ops).await
    }
}

// =============================================================================
// In-Memory
// =============================================================================

/// Process-local slots. Contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with the given slots already written.
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        MemoryStorage {
            slots: Mutex::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    fn slots(&self) -> DbResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.slots
            .lock()
            .map_err(|_| DbError::Internal("memory storage lock poisoned".to_string()))
    }
}

#[async_trait]
impl StorageBackend for MemoryStorage {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> DbResult<Option<String>> {
        Ok(self.slots()?.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> DbResult<()> {
        self.slots()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> DbResult<()> {
        self.slots()?.remove(key);
        Ok(())
    }

    /// Applied under a single lock so readers never see half a batch.
    async fn write_batch(&self, ops: Vec<WriteOp>) -> DbResult<()> {
        let mut slots = self.slots()?;
        for op in ops {
            match op {
                WriteOp::Put { key, value } => {
                    slots.insert(key, value);
                }
                WriteOp::Delete { key } => {
                    slots.remove(&key);
                }
            }
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
