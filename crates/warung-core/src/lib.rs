//! # warung-core: Pure Domain Logic for Warung Sayur
//!
//! Everything the shop knows about products, sales and purchases that does
//! not touch a disk: record types, money, validation, statistics and the
//! backup document format.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Warung Sayur Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    View layer (external)                        │   │
//! │  │   Dashboard ─ Sales ─ Purchases ─ Inventory ─ Report ─ Backup   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              warung-store (DataStore, Session)                  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ warung-core (THIS CRATE) ★                      │   │
//! │  │   types · money · validation · stats · report · backup · auth   │   │
//! │  │   NO I/O • NO DATABASE • PURE FUNCTIONS                         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Product, Sale, Purchase and their inputs
//! - [`money`] - Whole-rupiah money type
//! - [`error`] - Domain error types
//! - [`validation`] - Form-level input rules
//! - [`stats`] - Statistics aggregated over the three collections
//! - [`report`] - Financial report for the dashboard and report pages
//! - [`backup`] - Export/import document
//! - [`auth`] - Users, roles and the action policy
//!
//! ## Example Usage
//!
//! ```rust
//! use warung_core::money::Money;
//!
//! let sell_price = Money::from_rupiah(3000);
//! let total = sell_price * 5;
//! assert_eq!(total.to_string(), "Rp 15.000");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod auth;
pub mod backup;
pub mod error;
pub mod money;
pub mod report;
pub mod stats;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use auth::{Action, AuthError, Role, User};
pub use backup::Backup;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use report::{FinancialReport, ProductSalesSummary};
pub use stats::Statistics;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Storage key of the product collection.
pub const PRODUCTS_KEY: &str = "warung_sayur_products";

/// Storage key of the sale collection.
pub const SALES_KEY: &str = "warung_sayur_sales";

/// Storage key of the purchase collection.
pub const PURCHASES_KEY: &str = "warung_sayur_purchases";

/// Storage key of the logged-in user.
pub const SESSION_KEY: &str = "warung_sayur_user";

/// Customer recorded on a sale when the cashier leaves the field blank.
pub const DEFAULT_CUSTOMER: &str = "Pelanggan Umum";

/// Version written into every exported backup document.
pub const BACKUP_VERSION: &str = "1.0";

/// Number of sales shown in the "recent sales" list.
pub const RECENT_SALES_LIMIT: usize = 5;
