/// Database Module
///
/// This module provides the SQLite plumbing for TABQL, organized into
/// focused submodules.
///
/// ## Architecture
///
/// - **Connection Management** (`connection.rs`): opens connections and applies pragmas
/// - **Schema Introspection** (`schema.rs`): lists tables and reads column metadata
/// - **Query Execution** (`query.rs`): runs rendered statements and collects results
///
/// ## Error Handling
///
/// All database operations use the standardized `TabqlError` type for consistent error propagation.
pub mod connection;
pub mod query;
pub mod schema;

pub use connection::*;
pub use query::*;
pub use schema::*;
