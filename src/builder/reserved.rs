//! Reserved-word quoting for identifiers.
//!
//! Identifiers that collide with a SQLite keyword are wrapped in double
//! quotes. Inside a `FUNC(column)` aggregate only the inner identifier is
//! quoted.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use tracing::debug;

/// SQLite keywords, upper case.
pub const SQLITE_RESERVED_WORDS: &[&str] = &[
    "ABORT", "ACTION", "ADD", "AFTER", "ALL", "ALTER", "ANALYZE",
    "AND", "AS", "ASC", "ATTACH", "AUTOINCREMENT",
    "BEFORE", "BEGIN", "BETWEEN", "BY", "CASCADE",
    "CASE", "CAST", "CHECK", "COLLATE", "COLUMN",
    "COMMIT", "CONFLICT", "CONSTRAINT", "CREATE", "CROSS",
    "CURRENT_DATE", "CURRENT_TIME", "CURRENT_TIMESTAMP",
    "DATABASE", "DEFAULT", "DEFERRABLE", "DEFERRED", "DELETE",
    "DESC", "DETACH", "DISTINCT", "DO", "DROP",
    "EACH", "ELSE", "END", "ESCAPE", "EXCEPT",
    "EXCLUSIVE", "EXISTS", "EXPLAIN", "FAIL", "FOR",
    "FOREIGN", "FROM", "FULL", "GLOB", "GROUP",
    "HAVING", "IF", "IGNORE", "IMMEDIATE", "IN",
    "INDEX", "INDEXED", "INITIALLY", "INNER", "INSERT",
    "INSTEAD", "INTERSECT", "INTO", "IS", "ISNULL",
    "JOIN", "KEY", "LEFT", "LIKE", "LIMIT",
    "MATCH", "NATURAL", "NO", "NOT", "NOTHING",
    "NULL", "OF", "OFFSET", "ON", "OR",
    "ORDER", "OUTER", "PLAN", "PRAGMA", "PRIMARY",
    "QUERY", "RAISE", "RECURSIVE", "REFERENCES", "REGEXP",
    "REINDEX", "RELEASE", "RENAME", "REPLACE",
    "RESTRICT", "RIGHT", "ROLLBACK", "ROW", "SAVEPOINT",
    "SELECT", "SET", "TABLE", "TEMP", "TEMPORARY",
    "THEN", "TIES", "TO", "TRANSACTION", "TRIGGER",
    "UNION", "UNIQUE", "UPDATE", "USING", "VACUUM",
    "VALUES", "VIEW", "VIRTUAL", "WHEN", "WHERE",
    "WITH", "WITHOUT",
];

static RESERVED: Lazy<HashSet<&'static str>> =
    Lazy::new(|| SQLITE_RESERVED_WORDS.iter().copied().collect());

static AGGREGATE_CALL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\b(MIN|MAX|COUNT|SUM|AVG)\(\s*"?(\w+)"?\s*\)"#)
        .expect("aggregate pattern is valid")
});

/// Returns true when `identifier` matches a reserved word, ignoring case.
pub fn is_reserved(identifier: &str) -> bool {
    RESERVED.contains(identifier.to_ascii_uppercase().as_str())
}

/// Wraps `identifier` in double quotes when it is a reserved word.
pub fn quote_if_reserved(identifier: &str) -> String {
    if is_reserved(identifier) {
        debug!(identifier, "quoting reserved word");
        format!("\"{}\"", identifier)
    } else {
        identifier.to_string()
    }
}

/// Quotes a bare select-list entry. An aggregate call gets its argument
/// quoted; anything else is treated as a plain identifier.
pub fn quote_select_column(column: &str) -> String {
    if AGGREGATE_CALL.is_match(column) {
        quote_aggregate_argument(column)
    } else {
        quote_if_reserved(column)
    }
}

/// Quotes the argument of a leading `FUNC(column)` aggregate call when the
/// argument is a reserved word. Everything else passes through unchanged.
pub fn quote_aggregate_argument(expr: &str) -> String {
    let Some(caps) = AGGREGATE_CALL.captures(expr) else {
        return expr.to_string();
    };
    let column = &caps[2];
    if !is_reserved(column) {
        return expr.to_string();
    }

    debug!(column, "quoting reserved word inside aggregate");
    let whole = caps.get(0).map_or(0, |m| m.end());
    format!("{}(\"{}\"){}", &caps[1], column, &expr[whole..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_words_are_quoted() {
        assert_eq!(quote_if_reserved("index"), "\"index\"");
        assert_eq!(quote_if_reserved("Order"), "\"Order\"");
        assert_eq!(quote_if_reserved("imdb_score"), "imdb_score");
        assert_eq!(quote_if_reserved("type"), "type");
    }

    #[test]
    fn test_aggregate_argument_quoting() {
        assert_eq!(quote_aggregate_argument("AVG(index)"), "AVG(\"index\")");
        assert_eq!(quote_aggregate_argument("MIN( \"index\" )"), "MIN(\"index\")");
        assert_eq!(quote_aggregate_argument("COUNT(group) + 1"), "COUNT(\"group\") + 1");
    }

    #[test]
    fn test_select_column_quoting() {
        assert_eq!(quote_select_column("COUNT(index)"), "COUNT(\"index\")");
        assert_eq!(quote_select_column("AVG(INDEX)"), "AVG(\"INDEX\")");
        assert_eq!(quote_select_column("COUNT(*)"), "COUNT(*)");
        assert_eq!(quote_select_column("order"), "\"order\"");
        assert_eq!(quote_select_column("title"), "title");
    }

    #[test]
    fn test_aggregate_argument_passthrough() {
        assert_eq!(quote_aggregate_argument("AVG(imdb_score)"), "AVG(imdb_score)");
        assert_eq!(quote_aggregate_argument("index"), "index");
        assert_eq!(quote_aggregate_argument("avg(index)"), "avg(index)");
        assert_eq!(quote_aggregate_argument("MEDIAN(index)"), "MEDIAN(index)");
    }
}
