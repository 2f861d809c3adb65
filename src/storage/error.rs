//! Storage engine error types
//!
//! Defines all errors that can occur in the storage layer.

use thiserror::Error;

/// Errors that can occur in the weight store
#[derive(Error, Debug)]
pub enum StorageError {
    /// Underlying SQLite operation failed
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// I/O operation failed (e.g. creating the data directory)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Weight rejected at the point of persistence
    #[error("Invalid weight: {0} (must be a finite number greater than zero)")]
    InvalidWeight(f64),

    /// Lock acquisition failed
    #[error("Lock error: {0}")]
    Lock(String),
}

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
