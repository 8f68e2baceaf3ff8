/// Query Execution Module
///
/// Runs rendered SQL text against a connection and collects the column
/// names and rows of the result. Statements without a result set report
/// the number of affected rows instead.

use crate::core::{Result, TabqlError};
use rusqlite::{types::Value, Connection};

/// Represents the result of a SQL query execution
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    /// Column names from the query result
    pub columns: Vec<String>,
    /// Rows of data as SQLite values
    pub rows: Vec<Vec<Value>>,
    /// Number of rows returned
    pub row_count: usize,
}

impl QueryResult {
    /// Creates a new QueryResult from column names and row data
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let row_count = rows.len();
        QueryResult {
            columns,
            rows,
            row_count,
        }
    }

    /// Rows formatted for terminal display (`NULL` spelled out).
    pub fn display_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(format_value).collect())
            .collect()
    }
}

/// What executing a statement produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionOutcome {
    /// The statement produced a result set
    Rows(QueryResult),
    /// The statement produced no result set; carries the affected row count
    Affected(usize),
}

/// Query execution service that operates on a database connection
pub struct QueryExecutor<'a> {
    connection: &'a Connection,
}

impl<'a> QueryExecutor<'a> {
    /// Creates a new QueryExecutor for the given connection
    pub fn new(connection: &'a Connection) -> Self {
        QueryExecutor { connection }
    }

    /// Executes a SQL statement
    ///
    /// # Arguments
    ///
    /// * `sql` - The SQL statement to execute
    ///
    /// # Returns
    ///
    /// `ExecutionOutcome::Rows` when the statement has result columns,
    /// `ExecutionOutcome::Affected` otherwise.
    ///
    /// # Errors
    ///
    /// Returns `TabqlError::Query` if the SQL cannot be prepared or the
    /// database operation fails.
    pub fn execute(&self, sql: &str) -> Result<ExecutionOutcome> {
        let mut stmt = self
            .connection
            .prepare(sql)
            .map_err(|e| TabqlError::Query(format!("Failed to prepare statement: {}", e)))?;

        let column_count = stmt.column_count();
        if column_count == 0 {
            let affected = stmt
                .execute([])
                .map_err(|e| TabqlError::Query(format!("Statement execution failed: {}", e)))?;
            return Ok(ExecutionOutcome::Affected(affected));
        }

        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let rows = stmt
            .query_map([], |row| {
                let mut values = Vec::with_capacity(column_count);
                for i in 0..column_count {
                    values.push(row.get::<_, Value>(i)?);
                }
                Ok(values)
            })
            .map_err(|e| TabqlError::Query(format!("Query execution failed: {}", e)))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| TabqlError::Query(format!("Result processing failed: {}", e)))?;

        Ok(ExecutionOutcome::Rows(QueryResult::new(columns, rows)))
    }

    /// Executes a statement that must produce a result set.
    pub fn query(&self, sql: &str) -> Result<QueryResult> {
        match self.execute(sql)? {
            ExecutionOutcome::Rows(result) => Ok(result),
            ExecutionOutcome::Affected(_) => Err(TabqlError::Query(format!(
                "Statement returned no result set: {}",
                sql
            ))),
        }
    }
}

/// Formats a SQLite value for display
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Real(f) => f.to_string(),
        Value::Text(t) => t.clone(),
        Value::Blob(b) => format!("<BLOB: {} bytes>", b.len()),
    }
}

/// Formats a SQLite value as a CSV field; NULL becomes an empty field.
///
/// Reals keep their decimal point so a re-import infers REAL again.
pub fn format_csv_field(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Real(f) => format_real(*f),
        other => format_value(other),
    }
}

/// Reals always carry a decimal point, so `7.0` stays `7.0`.
pub fn format_real(r: f64) -> String {
    if r.is_finite() && r.fract() == 0.0 && r.abs() < 1e16 {
        format!("{:.1}", r)
    } else {
        r.to_string()
    }
}

/// Represents the SQL statement types the builder produces
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatementType {
    /// SELECT statement
    Select,
    /// INSERT statement
    Insert,
    /// UPDATE statement
    Update,
    /// DELETE statement
    Delete,
    /// Other statement types
    Other,
}

impl StatementType {
    /// Determines the statement type from a SQL string
    pub fn from_sql(sql: &str) -> Self {
        let sql_upper = sql.trim().to_uppercase();

        if sql_upper.starts_with("SELECT") {
            StatementType::Select
        } else if sql_upper.starts_with("INSERT") {
            StatementType::Insert
        } else if sql_upper.starts_with("UPDATE") {
            StatementType::Update
        } else if sql_upper.starts_with("DELETE") {
            StatementType::Delete
        } else {
            StatementType::Other
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn setup_test_table(conn: &Connection) {
        conn.execute_batch(
            "
            CREATE TABLE shows (
                id INTEGER PRIMARY KEY,
                title TEXT,
                imdb_score REAL
            );
            INSERT INTO shows (title, imdb_score) VALUES ('Dark', 8.7);
            INSERT INTO shows (title, imdb_score) VALUES ('Ozark', 8.4);
            INSERT INTO shows (title, imdb_score) VALUES (NULL, NULL);
        ",
        )
        .unwrap();
    }

    #[test]
    fn test_query_execution() {
        let conn = Connection::open_in_memory().unwrap();
        setup_test_table(&conn);

        let executor = QueryExecutor::new(&conn);
        let result = executor.query("SELECT * FROM shows ORDER BY id").unwrap();

        assert_eq!(result.columns, vec!["id", "title", "imdb_score"]);
        assert_eq!(result.row_count, 3);
        assert_eq!(
            result.rows[0],
            vec![Value::Integer(1), Value::Text("Dark".into()), Value::Real(8.7)]
        );
        assert_eq!(result.display_rows()[2], vec!["3", "NULL", "NULL"]);
    }

    #[test]
    fn test_update_reports_affected_rows() {
        let conn = Connection::open_in_memory().unwrap();
        setup_test_table(&conn);

        let executor = QueryExecutor::new(&conn);
        let outcome = executor
            .execute("UPDATE shows SET imdb_score = 9.0 WHERE title IS NOT NULL")
            .unwrap();
        assert_eq!(outcome, ExecutionOutcome::Affected(2));
        assert!(executor.query("DELETE FROM shows").is_err());
    }

    #[test]
    fn test_query_error_handling() {
        let conn = Connection::open_in_memory().unwrap();

        let executor = QueryExecutor::new(&conn);
        match executor.execute("SELECT * FROM nonexistent_table") {
            Err(TabqlError::Query(msg)) => assert!(msg.contains("no such table")),
            _ => panic!("Expected Query error"),
        }
    }

    #[test]
    fn test_csv_field_formatting() {
        assert_eq!(format_csv_field(&Value::Null), "");
        assert_eq!(format_csv_field(&Value::Integer(2026)), "2026");
        assert_eq!(format_csv_field(&Value::Real(8.5)), "8.5");
        assert_eq!(format_csv_field(&Value::Real(7.0)), "7.0");
        assert_eq!(format_value(&Value::Real(7.0)), "7");
        assert_eq!(format_value(&Value::Blob(vec![1, 2, 3])), "<BLOB: 3 bytes>");
    }

    #[test]
    fn test_statement_type_classification() {
        assert_eq!(StatementType::from_sql("SELECT * FROM users"), StatementType::Select);
        assert_eq!(StatementType::from_sql("INSERT INTO users VALUES (1)"), StatementType::Insert);
        assert_eq!(StatementType::from_sql("UPDATE users SET name = 'new'"), StatementType::Update);
        assert_eq!(StatementType::from_sql("  delete FROM users"), StatementType::Delete);
        assert_eq!(StatementType::from_sql("PRAGMA foreign_keys = ON"), StatementType::Other);
    }
}
