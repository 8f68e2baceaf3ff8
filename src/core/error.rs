/// TABQL Error Module
///
/// This module defines the error type shared by the statement builder, the
/// table store and the result exporter. Errors are raised at the call that
/// detects them; nothing is batched or retried.
use thiserror::Error;

/// Error type for the TABQL crate.
///
/// Builder misuse surfaces as `Value` or `Configuration`; anything touching
/// SQLite, the filesystem or the chart backend has its own variant.
#[derive(Error, Debug)]
pub enum TabqlError {
    /// Unknown dialect or an invalid configuration file
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An argument combination the builder or exporter cannot accept
    #[error("Value error: {0}")]
    Value(String),

    /// Database-related errors from SQLite operations
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Statement preparation or execution failed
    #[error("Query error: {0}")]
    Query(String),

    /// Missing tables or unusable table definitions
    #[error("Schema error: {0}")]
    Schema(String),

    /// File system and I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading and writing errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Chart rendering errors
    #[error("Chart error: {0}")]
    Chart(String),
}

/// Type alias for Result to use TabqlError as the error type.
pub type Result<T> = std::result::Result<T, TabqlError>;
