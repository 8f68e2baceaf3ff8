/// Connection Management Module
///
/// Opens SQLite connections for the table store and the result exporter.
/// Each owner keeps its own connection; there is no shared global state.

use crate::core::{Result, TabqlError};
use rusqlite::Connection;
use std::path::Path;
use tracing::info;

/// Path understood as an in-memory database.
pub const MEMORY_PATH: &str = ":memory:";

/// Opens a SQLite database at the specified path
///
/// # Arguments
///
/// * `db_path` - Path to the SQLite database file, or ":memory:" for in-memory database
///
/// # Returns
///
/// The open connection, or `TabqlError::Database` on failure.
pub fn open_connection<P: AsRef<Path>>(db_path: P) -> Result<Connection> {
    let db_path = db_path.as_ref();
    let conn = if db_path == Path::new(MEMORY_PATH) {
        Connection::open_in_memory()?
    } else {
        Connection::open(db_path)?
    };

    // Initialize connection with common pragmas
    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(TabqlError::Database)?;

    info!(path = %db_path.display(), "Connected to SQLite database");
    Ok(conn)
}

/// Closes a connection, surfacing the error SQLite reports on close.
pub fn close_connection(conn: Connection) -> Result<()> {
    conn.close().map_err(|(_, e)| TabqlError::Database(e))?;
    info!("Database connection closed");
    Ok(())
}
