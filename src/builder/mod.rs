//! Fluent SQL statement builder.
//!
//! A [`StatementBuilder`] accumulates clause fragments through chained
//! calls and renders them into a single statement string. Nothing is
//! executed and no parameters are bound: values are interpolated into the
//! text as they are given.
//!
//! ```
//! use tabql::builder::StatementBuilder;
//!
//! # fn main() -> tabql::core::Result<()> {
//! let sql = StatementBuilder::new("shows")
//!     .select([("AVG(imdb_score)", "avg_score")])
//!     .where_("type", false)?
//!     .and_("imdb_score", (">=", 7))?
//!     .group_by(["type"])
//!     .order_by(["avg_score"], true)
//!     .limit(5)
//!     .render();
//! assert_eq!(
//!     sql,
//!     "SELECT AVG(imdb_score) AS avg_score FROM shows WHERE type IS NOT NULL \
//!      AND imdb_score >= 7 GROUP BY type ORDER BY avg_score DESC LIMIT 5;"
//! );
//! # Ok(())
//! # }
//! ```

pub mod condition;
pub mod dialect;
pub mod reserved;

pub use condition::Value;
pub use dialect::Dialect;

use crate::core::{Result, TabqlError};
use condition::{render_assignment_value, render_condition};
use reserved::{quote_aggregate_argument, quote_if_reserved, quote_select_column};
use std::fmt;
use tracing::{debug, warn};

/// One entry of a SELECT list.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectItem {
    /// A bare column name or aggregate call; reserved identifiers are quoted.
    Column(String),
    /// `expr AS alias`; the expression is emitted verbatim apart from
    /// aggregate-argument quoting.
    Aliased { expr: String, alias: String },
}

impl SelectItem {
    pub fn aliased(expr: impl Into<String>, alias: impl Into<String>) -> Self {
        SelectItem::Aliased {
            expr: expr.into(),
            alias: alias.into(),
        }
    }

    fn render(&self) -> String {
        match self {
            SelectItem::Column(name) => quote_select_column(name),
            SelectItem::Aliased { expr, alias } => {
                format!("{} AS {}", quote_aggregate_argument(expr), alias)
            }
        }
    }
}

impl From<&str> for SelectItem {
    fn from(name: &str) -> Self {
        SelectItem::Column(name.to_string())
    }
}

impl From<String> for SelectItem {
    fn from(name: String) -> Self {
        SelectItem::Column(name)
    }
}

impl From<(&str, &str)> for SelectItem {
    fn from((expr, alias): (&str, &str)) -> Self {
        SelectItem::aliased(expr, alias)
    }
}

impl From<(String, String)> for SelectItem {
    fn from((expr, alias): (String, String)) -> Self {
        SelectItem::aliased(expr, alias)
    }
}

/// The single statement a builder produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Update,
    Delete,
}

/// Sort direction for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Order::Asc => "ASC",
            Order::Desc => "DESC",
        })
    }
}

/// Accumulates the clauses of one SELECT, UPDATE or DELETE statement.
///
/// Every mutator works in place and hands back the same builder. A fresh
/// builder is a `SELECT *` over its table.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementBuilder {
    table: String,
    dialect: Dialect,
    kind: StatementKind,
    /// Rendered select expressions, or `"col" = value` assignments for UPDATE.
    columns: Vec<String>,
    top: Option<u64>,
    conditions: Vec<String>,
    group_by: Option<Vec<String>>,
    order_by: Option<(Vec<String>, Order)>,
    limit: Option<u64>,
}

impl StatementBuilder {
    /// Creates a SQLite builder over `table`.
    pub fn new(table: impl Into<String>) -> Self {
        Self::for_dialect(table, Dialect::Sqlite)
    }

    /// Creates a builder for the named dialect.
    ///
    /// # Errors
    ///
    /// `TabqlError::Configuration` if the dialect is not one of
    /// `sqlite`, `mysql` or `postgresql`.
    pub fn with_dialect(table: impl Into<String>, dialect: &str) -> Result<Self> {
        Ok(Self::for_dialect(table, dialect.parse()?))
    }

    pub fn for_dialect(table: impl Into<String>, dialect: Dialect) -> Self {
        StatementBuilder {
            table: table.into(),
            dialect,
            kind: StatementKind::Select,
            columns: Vec::new(),
            top: None,
            conditions: Vec::new(),
            group_by: None,
            order_by: None,
            limit: None,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    /// The WHERE fragments in the order they were added.
    pub fn conditions(&self) -> &[String] {
        &self.conditions
    }

    /// Makes this a SELECT over `columns`; an empty list selects `*`.
    pub fn select<I>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<SelectItem>,
    {
        self.kind = StatementKind::Select;
        self.top = None;
        self.columns = columns
            .into_iter()
            .map(|item| item.into().render())
            .collect();
        self
    }

    /// Makes this a SELECT with an optional `TOP n` prefix.
    ///
    /// # Errors
    ///
    /// `TabqlError::Value` when `top` is set without a count, or a count is
    /// given while `top` is unset.
    pub fn select_top<I>(&mut self, columns: I, top: bool, top_count: Option<u64>) -> Result<&mut Self>
    where
        I: IntoIterator,
        I::Item: Into<SelectItem>,
    {
        let count = match (top, top_count) {
            (true, Some(count)) => Some(count),
            (false, None) => None,
            (true, None) => {
                return Err(TabqlError::Value(
                    "top_count is required when top is enabled.".to_string(),
                ))
            }
            (false, Some(_)) => {
                return Err(TabqlError::Value(
                    "top_count must not be given unless top is enabled.".to_string(),
                ))
            }
        };

        self.select(columns);
        self.top = count;
        if count.is_some() && self.limit.is_some() {
            warn!(table = %self.table, "statement carries both TOP and LIMIT");
        }
        Ok(self)
    }

    /// Makes this an UPDATE assigning each `(column, value)` pair in order.
    ///
    /// # Errors
    ///
    /// `TabqlError::Value` when no pairs are given or a value cannot be
    /// assigned.
    pub fn update<I, K, V>(&mut self, pairs: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut assignments = Vec::new();
        for (column, value) in pairs {
            let value = render_assignment_value(&value.into())?;
            assignments.push(format!("\"{}\" = {}", column.as_ref(), value));
        }
        if assignments.is_empty() {
            return Err(TabqlError::Value("No columns to update provided.".to_string()));
        }

        self.kind = StatementKind::Update;
        self.top = None;
        self.columns = assignments;
        Ok(self)
    }

    /// Makes this a DELETE. The columns are captured like a select list but
    /// are not part of the rendered statement.
    pub fn delete<I>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<SelectItem>,
    {
        self.select(columns);
        self.kind = StatementKind::Delete;
        self
    }

    /// Replaces every existing condition with this one.
    pub fn where_(&mut self, column: &str, value: impl Into<Value>) -> Result<&mut Self> {
        let fragment = render_condition(column, &value.into())?;
        self.conditions = vec![fragment];
        Ok(self)
    }

    pub fn and_(&mut self, column: &str, value: impl Into<Value>) -> Result<&mut Self> {
        self.push_prefixed("AND ", column, value.into())
    }

    pub fn or_(&mut self, column: &str, value: impl Into<Value>) -> Result<&mut Self> {
        self.push_prefixed("OR ", column, value.into())
    }

    /// Appends `IN` followed by the ordinary condition for `values`; this
    /// does not build a parenthesised value list. A space separates `IN`
    /// from the condition.
    pub fn in_(&mut self, column: &str, values: impl Into<Value>) -> Result<&mut Self> {
        self.push_prefixed("IN ", column, values.into())
    }

    /// Appends `NOT IN`, a space, then the ordinary condition for `values`.
    pub fn not_in_(&mut self, column: &str, values: impl Into<Value>) -> Result<&mut Self> {
        self.push_prefixed("NOT IN ", column, values.into())
    }

    /// Appends `col BETWEEN start AND end` with both bounds unquoted.
    pub fn between_(&mut self, column: &str, start: impl fmt::Display, end: impl fmt::Display) -> &mut Self {
        let fragment = format!("{} BETWEEN {} AND {}", quote_if_reserved(column), start, end);
        self.push_joined(fragment)
    }

    pub fn not_between_(&mut self, column: &str, start: impl fmt::Display, end: impl fmt::Display) -> &mut Self {
        let fragment = format!("{} NOT BETWEEN {} AND {}", quote_if_reserved(column), start, end);
        self.push_joined(fragment)
    }

    /// Appends `col LIKE "pattern"`.
    ///
    /// # Errors
    ///
    /// `TabqlError::Value` if the pattern is not text.
    pub fn like_(&mut self, column: &str, pattern: impl Into<Value>) -> Result<&mut Self> {
        let pattern = pattern.into();
        let Some(pattern) = pattern.as_text() else {
            return Err(TabqlError::Value("LIKE pattern must be a string.".to_string()));
        };
        let fragment = format!("{} LIKE \"{}\"", quote_if_reserved(column), pattern);
        Ok(self.push_joined(fragment))
    }

    /// Appends `EXISTS (subquery)` where the subquery is already rendered.
    ///
    /// # Errors
    ///
    /// `TabqlError::Value` if the subquery is not text.
    pub fn exists_(&mut self, subquery: impl Into<Value>) -> Result<&mut Self> {
        let subquery = subquery.into();
        let Some(subquery) = subquery.as_text() else {
            return Err(TabqlError::Value("EXISTS subquery must be a string.".to_string()));
        };
        let subquery = subquery.trim_end().trim_end_matches(';');
        let fragment = format!("EXISTS ({})", subquery);
        Ok(self.push_joined(fragment))
    }

    /// Sets `GROUP BY`; field names are emitted as given.
    pub fn group_by<I>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        self.group_by = (!fields.is_empty()).then_some(fields);
        self
    }

    /// Sets `ORDER BY fields ASC`, or `DESC` when `desc` is true.
    pub fn order_by<I>(&mut self, fields: I, desc: bool) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        let order = if desc { Order::Desc } else { Order::Asc };
        self.order_by = (!fields.is_empty()).then_some((fields, order));
        self
    }

    pub fn limit(&mut self, n: u64) -> &mut Self {
        if self.top.is_some() {
            warn!(table = %self.table, "statement carries both TOP and LIMIT");
        }
        self.limit = Some(n);
        self
    }

    /// Renders the accumulated clauses into one statement ending in `;`.
    pub fn render(&self) -> String {
        let mut sql = match self.kind {
            StatementKind::Select => {
                let top = self.top.map(|n| format!("TOP {} ", n)).unwrap_or_default();
                let columns = if self.columns.is_empty() {
                    "*".to_string()
                } else {
                    self.columns.join(", ")
                };
                format!("SELECT {}{} FROM {} ", top, columns, self.table)
            }
            StatementKind::Update => format!("UPDATE {} SET {} ", self.table, self.columns.join(", ")),
            StatementKind::Delete => format!("DELETE FROM {} ", self.table),
        };

        if !self.conditions.is_empty() {
            sql.push_str("WHERE ");
            sql.push_str(&self.conditions.join(" "));
            sql.push(' ');
        }
        if let Some(fields) = &self.group_by {
            sql.push_str(&format!("GROUP BY {} ", fields.join(", ")));
        }
        if let Some((fields, order)) = &self.order_by {
            sql.push_str(&format!("ORDER BY {} {} ", fields.join(", "), order));
        }
        if let Some(n) = self.limit {
            sql.push_str(&format!("LIMIT {}", n));
        }

        let mut sql = sql.trim_end().to_string();
        sql.push(';');
        debug!(dialect = %self.dialect, sql = %sql, "rendered statement");
        sql
    }

    fn push_prefixed(&mut self, prefix: &str, column: &str, value: Value) -> Result<&mut Self> {
        let fragment = render_condition(column, &value)?;
        self.conditions.push(format!("{}{}", prefix, fragment));
        Ok(self)
    }

    /// Appends a fragment that has no connective of its own, joining it to
    /// earlier fragments with `AND`.
    fn push_joined(&mut self, fragment: String) -> &mut Self {
        if self.conditions.is_empty() {
            self.conditions.push(fragment);
        } else {
            self.conditions.push(format!("AND {}", fragment));
        }
        self
    }
}

impl fmt::Display for StatementBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "NetflixTVShowsAndMovies";

    #[test]
    fn test_fresh_builder_selects_everything() {
        assert_eq!(StatementBuilder::new(TABLE).render(), format!("SELECT * FROM {};", TABLE));
    }

    #[test]
    fn test_select_kind_switching_clears_columns() {
        let mut builder = StatementBuilder::new("T");
        builder.select(["title"]);
        builder.update([("title", "Dark")]).unwrap();
        assert_eq!(builder.kind(), StatementKind::Update);
        assert_eq!(builder.render(), "UPDATE T SET \"title\" = 'Dark';");

        builder.select(Vec::<&str>::new());
        assert_eq!(builder.render(), "SELECT * FROM T;");
    }

    #[test]
    fn test_delete_ignores_captured_columns() {
        let mut builder = StatementBuilder::new("T");
        builder.delete(["index"]).where_("index", 3).unwrap();
        assert_eq!(builder.render(), "DELETE FROM T WHERE \"index\" = 3;");
    }

    #[test]
    fn test_top() {
        let mut builder = StatementBuilder::new("T");
        builder.select_top(["title"], true, Some(10)).unwrap();
        assert_eq!(builder.render(), "SELECT TOP 10 title FROM T;");

        builder.select_top(["title"], false, None).unwrap();
        assert_eq!(builder.render(), "SELECT title FROM T;");
    }

    #[test]
    fn test_failed_call_leaves_builder_untouched() {
        let mut builder = StatementBuilder::new("T");
        builder.select(["title"]).where_("id", 1).unwrap();
        let before = builder.clone();

        assert!(builder.and_("id", vec![1, 2]).is_err());
        assert!(builder.update(Vec::<(&str, i64)>::new()).is_err());
        assert!(builder.select_top(["x"], true, None).is_err());
        assert_eq!(builder, before);
    }

    #[test]
    fn test_render_is_idempotent() {
        let mut builder = StatementBuilder::new("T");
        builder.select(["title"]).limit(3);
        assert_eq!(builder.render(), builder.render());
        assert_eq!(builder.to_string(), "SELECT title FROM T LIMIT 3;");
    }
}
