//! # Repository Module
//!
//! SQL access for Warung Sayur.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  SqliteStorage (storage.rs)                                            │
//! │       │                                                                 │
//! │       │  db.kv().put("warung_sayur_products", json)                    │
//! │       ▼                                                                 │
//! │  KvRepository                                                          │
//! │  ├── get(&self, key)                                                   │
//! │  ├── put(&self, key, value)                                            │
//! │  ├── delete(&self, key)                                                │
//! │  ├── keys(&self)                                                       │
//! │  └── apply(&self, ops)      ← several writes, one transaction          │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite kv_store table                                                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`KvRepository`](kv::KvRepository) - String-keyed JSON slots

pub mod kv;
