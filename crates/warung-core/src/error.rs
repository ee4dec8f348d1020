//! # Error Types
//!
//! Domain-specific error types for warung-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  warung-core errors (this file)                                        │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  warung-db errors                                                      │
//! │  └── DbError          - Persistence failures (non-blocking)            │
//! │                                                                         │
//! │  warung-store errors                                                   │
//! │  └── ApiError         - What the view layer sees (serialized)          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → View layer             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Not-found on update/delete is never an error here; those operations
//! return `Option` and treat a missing id as a no-op.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations.
///
/// Every variant is raised before any collection is touched, so a caller
/// receiving one of these can assume nothing changed.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The referenced product does not exist.
    ///
    /// ## When This Occurs
    /// - A sale or purchase names a product id that was deleted
    /// - The view layer holds a stale product list
    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    /// Insufficient stock to complete a sale.
    ///
    /// ## User Workflow
    /// ```text
    /// Sales form (qty: 25)
    ///      │
    ///      ▼
    /// Check stock: available=20
    ///      │
    ///      ▼
    /// InsufficientStock { product: "Bayam", available: 20, requested: 25 }
    ///      │
    ///      ▼
    /// UI shows: "Insufficient stock for Bayam: available 20, requested 25"
    /// ```
    #[error("Insufficient stock for {product}: available {available}, requested {requested}")]
    InsufficientStock {
        product: String,
        available: i64,
        requested: i64,
    },

    /// A stock level or total would not fit in an `i64`.
    #[error("{0} is too large")]
    TooLarge(String),

    /// The backup document is malformed.
    #[error("Invalid backup file: {0}")]
    InvalidBackup(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised by the form-level checks in [`crate::validation`].
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value is outside the accepted range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Sell price does not exceed buy price.
    #[error("sell price ({sell}) must be higher than buy price ({buy})")]
    SellPriceNotAboveBuyPrice { buy: i64, sell: i64 },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
