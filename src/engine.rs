//! Table store: creates tables from inferred schemas and imports CSV files.

use crate::core::db::{self, Column, ExecutionOutcome, QueryExecutor};
use crate::core::{Result, TabqlError};
use crate::inference::{infer_schema, parse_cell, SqlType};
use rusqlite::{params_from_iter, Connection};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// Column name and type pairs, in table order.
pub type TableSchema = Vec<(String, SqlType)>;

/// A SQLite database plus the schemas of tables created through it.
pub struct DataEngine {
    db_path: String,
    conn: Connection,
    schemas: HashMap<String, TableSchema>,
}

impl DataEngine {
    /// Opens (or creates) the database file at `db_path`.
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = db::open_connection(&db_path)?;
        Ok(DataEngine {
            db_path: db_path.as_ref().display().to_string(),
            conn,
            schemas: HashMap::new(),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::open(db::MEMORY_PATH)
    }

    pub fn path(&self) -> &str {
        &self.db_path
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Creates `table` if it does not exist yet and remembers its schema.
    pub fn create_table(&mut self, table: &str, columns: &[(String, SqlType)]) -> Result<()> {
        let sql = create_table_sql(table, columns, true)?;
        self.conn.execute(&sql, [])?;
        self.schemas.insert(table.to_string(), columns.to_vec());
        info!(table, columns = %describe(columns), "Created table");
        Ok(())
    }

    /// Infers a schema from `records` and creates `table` with it.
    pub fn create_table_from_records<S: AsRef<str>>(
        &mut self,
        table: &str,
        headers: &[String],
        records: &[Vec<S>],
    ) -> Result<()> {
        let schema = infer_schema(headers, records);
        self.create_table(table, &schema)
    }

    /// Imports a CSV file, replacing any table of the same name.
    ///
    /// Without an explicit `table_name` the file stem is used, with spaces
    /// turned into underscores. A schema created earlier in this session is
    /// reused when its column names match the file's header.
    ///
    /// # Returns
    ///
    /// The name of the table the rows landed in.
    pub fn import_csv<P: AsRef<Path>>(&mut self, path: P, table_name: Option<&str>) -> Result<String> {
        let path = path.as_ref();
        let mut reader = csv::Reader::from_path(path)?;
        let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();
        if headers.is_empty() {
            return Err(TabqlError::Schema(format!(
                "CSV file '{}' has no header row",
                path.display()
            )));
        }
        let records = reader
            .records()
            .map(|record| record.map(|r| r.iter().map(String::from).collect::<Vec<_>>()))
            .collect::<std::result::Result<Vec<_>, csv::Error>>()?;

        let table = match table_name {
            Some(name) => name.to_string(),
            None => default_table_name(path)?,
        };

        let schema = match self.schemas.get(&table) {
            Some(cached) if cached.iter().map(|(name, _)| name).eq(headers.iter()) => cached.clone(),
            _ => infer_schema(&headers, &records),
        };

        let tx = self.conn.transaction()?;
        tx.execute(&format!("DROP TABLE IF EXISTS {}", quote_identifier(&table)), [])?;
        tx.execute(&create_table_sql(&table, &schema, false)?, [])?;
        {
            let placeholders: Vec<String> = (1..=schema.len()).map(|i| format!("?{}", i)).collect();
            let column_list: Vec<String> = schema.iter().map(|(name, _)| quote_identifier(name)).collect();
            let insert = format!(
                "INSERT INTO {} ({}) VALUES ({})",
                quote_identifier(&table),
                column_list.join(", "),
                placeholders.join(", ")
            );
            debug!(sql = %insert, "prepared import statement");
            let mut stmt = tx.prepare(&insert)?;
            for record in &records {
                let values = schema.iter().enumerate().map(|(i, (_, sql_type))| {
                    record
                        .get(i)
                        .map_or(rusqlite::types::Value::Null, |raw| parse_cell(raw, *sql_type))
                });
                stmt.execute(params_from_iter(values))?;
            }
        }
        tx.commit()?;

        info!(table = %table, columns = %describe(&schema), "Created table");
        self.schemas.insert(table.clone(), schema);
        info!(rows = records.len(), table = %table, "Imported rows");
        Ok(table)
    }

    /// Returns the schema of `table`, from this session's cache when
    /// available and from `PRAGMA table_info` otherwise.
    pub fn get_schema(&self, table: &str) -> Result<Vec<Column>> {
        if let Some(schema) = self.schemas.get(table) {
            return Ok(schema
                .iter()
                .map(|(name, sql_type)| Column::new(name.clone(), sql_type.as_str()))
                .collect());
        }

        let columns = db::get_table_columns(&self.conn, table)?;
        if columns.is_empty() {
            return Err(TabqlError::Schema(format!("No such table: {}", table)));
        }
        Ok(columns)
    }

    pub fn list_tables(&self) -> Result<Vec<String>> {
        db::list_tables(&self.conn)
    }

    /// Executes a rendered statement.
    pub fn execute(&self, sql: &str) -> Result<ExecutionOutcome> {
        QueryExecutor::new(&self.conn).execute(sql)
    }

    pub fn close(self) -> Result<()> {
        db::close_connection(self.conn)
    }
}

/// Wraps an identifier in double quotes, doubling embedded quotes.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn create_table_sql(table: &str, columns: &[(String, SqlType)], if_not_exists: bool) -> Result<String> {
    if columns.is_empty() {
        return Err(TabqlError::Schema(format!(
            "Cannot create table '{}' without columns",
            table
        )));
    }
    let definitions: Vec<String> = columns
        .iter()
        .map(|(name, sql_type)| format!("{} {}", quote_identifier(name), sql_type))
        .collect();
    Ok(format!(
        "CREATE TABLE {}{} ({})",
        if if_not_exists { "IF NOT EXISTS " } else { "" },
        quote_identifier(table),
        definitions.join(", ")
    ))
}

fn default_table_name(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(|stem| stem.replace(' ', "_"))
        .ok_or_else(|| {
            TabqlError::Schema(format!("Cannot derive a table name from '{}'", path.display()))
        })
}

fn describe(columns: &[(String, SqlType)]) -> String {
    columns
        .iter()
        .map(|(name, sql_type)| format!("{}: {}", name, sql_type))
        .collect::<Vec<_>>()
        .join(", ")
}
