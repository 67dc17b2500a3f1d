//! Core error types for the PriceDock backend.
//!
//! Database-agnostic by construction: storage backends convert their own
//! errors into [`DatabaseError`] before they reach this crate.

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the pricing backend.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    /// Misconfiguration detected before any work starts (unknown or
    /// inactive provider, missing adapter factory). Fails fast, no job
    /// bookkeeping.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// A provider fetch came back failed; surfaced after the sync job
    /// row has been marked Failed.
    #[error("Sync failed for provider '{provider}': {message}")]
    Sync { provider: String, message: String },

    #[error("Input validation failed: {0}")]
    Validation(String),
}

/// Database-agnostic error type for storage operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    #[error("Database query failed: {0}")]
    QueryFailed(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),
}
