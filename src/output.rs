//! Result exporter: runs a rendered statement, writes the rows to CSV and
//! charts them.
//!
//! When the statement yields no result set (UPDATE, DELETE, ...), the
//! exporter re-reads the whole table with `SELECT * FROM <table>`. The table
//! name is taken as the second whitespace-separated token of the statement,
//! so this only works when that token is exactly the table name:
//! `UPDATE shows SET ...` works, `DELETE FROM shows` does not.

use crate::builder::StatementBuilder;
use crate::core::db::{self, format_csv_field, ExecutionOutcome, QueryExecutor, QueryResult, StatementType};
use crate::core::{Result, TabqlError};
use crate::plot::{self, ChartData, PlotKind};
use rusqlite::types::Value as SqlValue;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tracing::info;

/// Where exported files go and how large charts are.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    pub directory: PathBuf,
    pub figsize: (u32, u32),
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions {
            directory: PathBuf::from("."),
            figsize: plot::DEFAULT_SIZE,
        }
    }
}

/// Header and rows read back from an exported CSV file.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// The exported result of one statement.
#[derive(Debug)]
pub struct DataOutput {
    output_name: String,
    csv_path: PathBuf,
    chart_path: PathBuf,
    figsize: (u32, u32),
    columns: Vec<String>,
    rows: Vec<Vec<SqlValue>>,
}

impl DataOutput {
    /// Connects to `db_path`, executes `query` and exports the result to
    /// `<directory>/<output_name>.csv`. A blank query exports nothing.
    ///
    /// The connection is closed before this returns.
    pub fn run<P: AsRef<Path>>(db_path: P, query: &str, output_name: &str, options: ExportOptions) -> Result<Self> {
        let mut output = Self::existing(output_name, options);
        let conn = db::open_connection(db_path)?;

        if !query.trim().is_empty() {
            let result = execute_query(&conn, query)?;
            output.columns = result.columns;
            output.rows = result.rows;
            output.export_to_csv()?;
        }

        db::close_connection(conn)?;
        Ok(output)
    }

    /// Refers to a previous export without running anything.
    pub fn existing(output_name: &str, options: ExportOptions) -> Self {
        DataOutput {
            output_name: output_name.to_string(),
            csv_path: options.directory.join(format!("{}.csv", output_name)),
            chart_path: options.directory.join(format!("{}.svg", output_name)),
            figsize: options.figsize,
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn output_name(&self) -> &str {
        &self.output_name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<SqlValue>] {
        &self.rows
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }

    pub fn chart_path(&self) -> &Path {
        &self.chart_path
    }

    /// The exported rows as a query result, for display.
    pub fn result(&self) -> QueryResult {
        QueryResult::new(self.columns.clone(), self.rows.clone())
    }

    pub fn set_figsize(&mut self, width: u32, height: u32) {
        self.figsize = (width, height);
    }

    /// Reads the exported CSV file back.
    pub fn read_csv(&self) -> Result<CsvTable> {
        let mut reader = csv::Reader::from_path(&self.csv_path)?;
        let headers = reader.headers()?.iter().map(String::from).collect();
        let rows = reader
            .records()
            .map(|record| record.map(|r| r.iter().map(String::from).collect()))
            .collect::<std::result::Result<Vec<_>, csv::Error>>()?;
        Ok(CsvTable { headers, rows })
    }

    /// Charts the first two exported columns and returns the SVG path.
    ///
    /// # Errors
    ///
    /// `TabqlError::Value` when the export has fewer than two columns or no
    /// numeric y values; `TabqlError::Chart` when drawing fails.
    pub fn plot(&self, kind: PlotKind, title: Option<&str>) -> Result<PathBuf> {
        let table = self.read_csv()?;
        let data = ChartData::from_columns(&table.headers, &table.rows)?;
        let title = title.map_or_else(|| data.default_title(), str::to_string);
        plot::render_svg(&data, kind, &title, self.figsize, &self.chart_path)?;
        Ok(self.chart_path.clone())
    }

    fn export_to_csv(&self) -> Result<()> {
        if let Some(parent) = self.csv_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut writer = csv::Writer::from_path(&self.csv_path)?;
        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.write_record(row.iter().map(format_csv_field))?;
        }
        writer.flush()?;
        info!(path = %self.csv_path.display(), rows = self.rows.len(), "Exported CSV");
        Ok(())
    }
}

/// Executes `query`, falling back to a full-table SELECT when it yields no
/// result set.
fn execute_query(conn: &Connection, query: &str) -> Result<QueryResult> {
    let executor = QueryExecutor::new(conn);
    match executor.execute(query)? {
        ExecutionOutcome::Rows(result) => Ok(result),
        ExecutionOutcome::Affected(affected) => {
            info!(
                affected,
                statement = ?StatementType::from_sql(query),
                "Query executed: no result set"
            );
            let table = fallback_table(query)?;
            executor.query(&StatementBuilder::new(table).render())
        }
    }
}

/// The second whitespace-separated token of `query`.
pub fn fallback_table(query: &str) -> Result<&str> {
    query.split_whitespace().nth(1).ok_or_else(|| {
        TabqlError::Value(format!("Cannot determine the table of statement: {}", query))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_table() {
        assert_eq!(fallback_table("UPDATE shows SET \"x\" = 1;").unwrap(), "shows");
        assert_eq!(fallback_table("DELETE FROM shows;").unwrap(), "FROM");
        assert!(fallback_table("VACUUM").is_err());
    }

    #[test]
    fn test_existing_paths() {
        let options = ExportOptions {
            directory: PathBuf::from("out"),
            figsize: (800, 400),
        };
        let output = DataOutput::existing("results", options);
        assert_eq!(output.csv_path(), Path::new("out/results.csv"));
        assert_eq!(output.chart_path(), Path::new("out/results.svg"));
        assert!(output.columns().is_empty());
    }

    #[test]
    fn test_blank_query_exports_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let options = ExportOptions {
            directory: dir.path().to_path_buf(),
            ..ExportOptions::default()
        };
        let output = DataOutput::run(dir.path().join("empty.db"), "  ", "nothing", options).unwrap();
        assert!(!output.csv_path().exists());
    }
}
