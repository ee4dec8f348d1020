//! # Key-Value Repository
//!
//! Reads and writes the `kv_store` table. Values are opaque text here;
//! JSON encoding happens one level up in [`Persistence`](crate::Persistence).

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::storage::WriteOp;

const UPSERT_SQL: &str = r#"
    INSERT INTO kv_store (key, value, updated_at)
    VALUES (?1, ?2, ?3)
    ON CONFLICT(key) DO UPDATE SET
        value = excluded.value,
        updated_at = excluded.updated_at
"#;

const DELETE_SQL: &str = "DELETE FROM kv_store WHERE key = ?1";

/// Repository for the string-keyed slots.
#[derive(Debug, Clone)]
pub struct KvRepository {
    pool: SqlitePool,
}

impl KvRepository {
    /// Creates a new KvRepository.
    pub fn new(pool: SqlitePool) -> Self {
        KvRepository { pool }
    }

    /// Returns the stored value, or `None` if the key was never written
    /// or has been removed.
    pub async fn get(&self, key: &str) -> DbResult<Option<String>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        Ok(value)
    }

    /// Inserts or replaces the value under `key`.
    pub async fn put(&self, key: &str, value: &str) -> DbResult<()> {
        debug!(key = %key, bytes = value.len(), "Writing slot");

        sqlx::query(UPSERT_SQL)
            .bind(key)
            .bind(value)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Removes `key`. Returns whether a row was deleted.
    pub async fn delete(&self, key: &str) -> DbResult<bool> {
        debug!(key = %key, "Removing slot");

        let result = sqlx::query(DELETE_SQL)
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// All stored keys, sorted.
    pub async fn keys(&self) -> DbResult<Vec<String>> {
        let keys: Vec<String> = sqlx::query_scalar("SELECT key FROM kv_store ORDER BY key")
            .fetch_all(&self.pool)
            .await?;

        Ok(keys)
    }

    /// Applies every operation in one transaction: all of them land or none do.
    pub async fn apply(&self, ops: &[WriteOp]) -> DbResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let now = Utc::now();
        for op in ops {
            match op {
                WriteOp::Put { key, value } => {
                    sqlx::query(UPSERT_SQL)
                        .bind(key.as_str())
                        .bind(value.as_str())
                        .bind(now)
                        .execute(&mut *tx)
                        .await?;
                }
                WriteOp::Delete { key } => {
                    sqlx::query(DELETE_SQL)
                        .bind(key.as_str())
                        .execute(&mut *tx)
                        .await?;
                }
            }
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        debug!(ops = ops.len(), "Slot batch committed");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
