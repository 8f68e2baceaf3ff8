/// Core Module for TABQL
///
/// Shared infrastructure for the crate: the error type and the thin SQLite
/// layer (connections, statement execution, schema introspection) used by
/// the table store and the result exporter.

pub mod db;
pub mod error;

// Re-export commonly used types for convenience
pub use error::{Result, TabqlError};
