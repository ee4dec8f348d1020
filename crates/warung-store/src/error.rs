//! # Store and API Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Warung Sayur                           │
//! │                                                                         │
//! │  ValidationError ──► CoreError ──┐                                     │
//! │                                  │                                      │
//! │  AuthError ──────────────────────┼──► StoreError ──► ApiError ──► view │
//! │                                  │                  {code, message}     │
//! │  DbError ────────────────────────┤                                      │
//! │                                  │                                      │
//! │  toml / io (config) ─────────────┘                                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Persistence failures inside a DataStore operation never reach this
//! flow; they become the store's persistence warning instead.

use serde::Serialize;
use thiserror::Error;
use ts_rs::TS;
use warung_core::{AuthError, CoreError, ValidationError};
use warung_db::DbError;

/// Errors from opening and configuring the application.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Configuration file unreadable or invalid.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Filesystem error (config file, data directory).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl From<toml::de::Error> for StoreError {
    fn from(err: toml::de::Error) -> Self {
        StoreError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for StoreError {
    fn from(err: toml::ser::Error) -> Self {
        StoreError::Config(err.to_string())
    }
}

/// Result type for application-level operations.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// API Error
// =============================================================================

/// Error payload handed to the view layer.
///
/// ```json
/// {
///   "code": "INSUFFICIENT_STOCK",
///   "message": "Insufficient stock for Bayam: available 3, requested 5"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum ErrorCode {
    /// Referenced product does not exist
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Sale quantity exceeds stock
    InsufficientStock,

    /// Uploaded backup file rejected
    InvalidBackup,

    /// Wrong username or password
    Unauthorized,

    /// Storage operation failed
    DatabaseError,

    /// Configuration problem
    ConfigError,

    /// Anything else
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::ProductNotFound(_) => ErrorCode::NotFound,
            CoreError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
            CoreError::InvalidBackup(_) => ErrorCode::InvalidBackup,
            CoreError::Validation(_) | CoreError::TooLarge(_) => ErrorCode::ValidationError,
        };
        ApiError::new(code, err.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::new(ErrorCode::Unauthorized, err.to_string())
    }
}

/// Database details are logged, the view gets a generic message.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        tracing::error!("Storage operation failed: {}", err);
        let message = match err {
            DbError::ConnectionFailed(_) => "Database connection failed",
            DbError::MigrationFailed(_) => "Database migration failed",
            DbError::PoolExhausted => "Database is busy",
            _ => "Database operation failed",
        };
        ApiError::new(ErrorCode::DatabaseError, message)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Config(message) => ApiError::new(ErrorCode::ConfigError, message),
            StoreError::Io(e) => ApiError::internal(e.to_string()),
            StoreError::Db(e) => e.into(),
            StoreError::Core(e) => e.into(),
            StoreError::Auth(e) => e.into(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
