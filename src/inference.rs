//! Column type inference for imported tabular data.
//!
//! Every CSV field arrives as text; a column's type is decided from a
//! single sample row, the first one without empty fields.

use rusqlite::types::Value as SqlValue;
use std::fmt;

/// Storage type assigned to an imported column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Integer,
    Real,
    Text,
}

impl SqlType {
    pub fn as_str(self) -> &'static str {
        match self {
            SqlType::Integer => "INTEGER",
            SqlType::Real => "REAL",
            SqlType::Text => "TEXT",
        }
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps one sample value to a column type. Empty samples are TEXT.
pub fn infer_sql_type(sample: &str) -> SqlType {
    let sample = sample.trim();
    if sample.is_empty() {
        SqlType::Text
    } else if sample.parse::<i64>().is_ok() {
        SqlType::Integer
    } else if sample.parse::<f64>().is_ok() {
        SqlType::Real
    } else {
        SqlType::Text
    }
}

/// Infers one type per header from the first complete record.
///
/// Falls back to the first record when every record has a gap, and to TEXT
/// everywhere when there are no records at all.
pub fn infer_schema<S: AsRef<str>>(headers: &[String], records: &[Vec<S>]) -> Vec<(String, SqlType)> {
    let sample = records
        .iter()
        .find(|record| {
            record.len() >= headers.len() && record.iter().all(|field| !field.as_ref().trim().is_empty())
        })
        .or_else(|| records.first());

    headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            let sql_type = sample
                .and_then(|record| record.get(i))
                .map_or(SqlType::Text, |field| infer_sql_type(field.as_ref()));
            (header.clone(), sql_type)
        })
        .collect()
}

/// Converts a raw field into the value stored for a column of `sql_type`.
///
/// Empty fields become NULL; fields that do not parse as the column type
/// are stored as text, which SQLite's type affinity permits.
pub fn parse_cell(raw: &str, sql_type: SqlType) -> SqlValue {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return SqlValue::Null;
    }
    match sql_type {
        SqlType::Integer => trimmed
            .parse::<i64>()
            .map(SqlValue::Integer)
            .unwrap_or_else(|_| SqlValue::Text(raw.to_string())),
        SqlType::Real => trimmed
            .parse::<f64>()
            .map(SqlValue::Real)
            .unwrap_or_else(|_| SqlValue::Text(raw.to_string())),
        SqlType::Text => SqlValue::Text(raw.to_string()),
    }
}
