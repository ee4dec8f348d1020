//! # warung-db: Persistence Layer for Warung Sayur
//!
//! Durable storage for the shop's collections. Each collection is one JSON
//! document in a string-keyed slot, the same shape the data had in the
//! browser's local storage.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Warung Sayur Data Flow                             │
//! │                                                                         │
//! │  DataStore::add_sale (warung-store)                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     warung-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐  │   │
//! │  │   │  Persistence  │    │ StorageBackend │    │  Migrations  │  │   │
//! │  │   │ (JSON slots)  │───►│ SqliteStorage  │───►│  (embedded)  │  │   │
//! │  │   │ load/save/rm  │    │ MemoryStorage  │    │ 001_kv.sql   │  │   │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │   SQLite: kv_store(key, value, updated_at)                      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - SQL access to the `kv_store` table
//! - [`storage`] - The `StorageBackend` seam and its two implementations
//! - [`persistence`] - Typed load/save/remove with fallback and logging
//!
//! ## Usage
//!
//! ```rust,ignore
//! use warung_db::{Database, DbConfig, Persistence};
//!
//! let db = Database::new(DbConfig::new("warung.db")).await?;
//! let persistence = Persistence::sqlite(&db);
//!
//! let products: Vec<Product> = persistence.load(PRODUCTS_KEY, Vec::new).await;
//! persistence.save(PRODUCTS_KEY, &products).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod persistence;
pub mod pool;
pub mod repository;
pub mod storage;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use persistence::{Persistence, WriteBatch};
pub use pool::{Database, DbConfig};
pub use repository::kv::KvRepository;
pub use storage::{MemoryStorage, SqliteStorage, StorageBackend, WriteOp};
