//! Condition values and their rendering into WHERE fragments.

use super::reserved::quote_if_reserved;
use crate::core::db::format_real;
use crate::core::{Result, TabqlError};
use std::fmt;

/// A value handed to a condition or an update assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The absence marker; renders `IS NULL`.
    Null,
    Bool(bool),
    Integer(i64),
    Real(f64),
    Text(String),
    /// An `(operator, operand)` pair such as `(">=", 7)`.
    Compare(String, Box<Value>),
    /// A sequence of values. No condition accepts this shape.
    List(Vec<Value>),
}

impl Value {
    /// Builds an `(operator, operand)` comparison.
    pub fn compare(op: impl Into<String>, operand: impl Into<Value>) -> Self {
        Value::Compare(op.into(), Box::new(operand.into()))
    }

    /// The text payload, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Real(r) => f.write_str(&format_real(*r)),
            Value::Text(t) => f.write_str(t),
            Value::Compare(op, operand) => write!(f, "({}, {})", op, operand),
            Value::List(values) => {
                f.write_str("[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                f.write_str("]")
            }
        }
    }
}

macro_rules! value_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::Integer(i64::from(v))
            }
        })*
    };
}

value_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Real(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<(&str, T)> for Value {
    fn from((op, operand): (&str, T)) -> Self {
        Value::compare(op, operand)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::List(values.into_iter().map(Into::into).collect())
    }
}

/// Renders one condition for `column` according to the shape of `value`.
///
/// `false` means "has a value" and renders `IS NOT NULL`; `true` renders as
/// an equality against the literal `true`.
pub fn render_condition(column: &str, value: &Value) -> Result<String> {
    let subject = quote_if_reserved(column);
    match value {
        Value::Null => Ok(format!("{} IS NULL", subject)),
        Value::Bool(false) => Ok(format!("{} IS NOT NULL", subject)),
        Value::Compare(op, operand) => render_comparison(&subject, op, operand),
        Value::Integer(_) | Value::Real(_) | Value::Bool(true) => {
            Ok(format!("{} = {}", subject, value))
        }
        Value::Text(text) => Ok(format!("{} = \"{}\"", subject, text)),
        Value::List(_) => Err(unsupported(value)),
    }
}

fn render_comparison(subject: &str, op: &str, operand: &Value) -> Result<String> {
    match operand {
        Value::Null => match op.trim() {
            "!=" | "<>" => Ok(format!("{} IS NOT NULL", subject)),
            "=" => Ok(format!("{} IS NULL", subject)),
            other => Err(TabqlError::Value(format!(
                "Operator '{}' cannot be compared against NULL",
                other
            ))),
        },
        Value::Text(text) => Ok(format!("{} {} \"{}\"", subject, op, text)),
        Value::Integer(_) | Value::Real(_) | Value::Bool(_) => {
            Ok(format!("{} {} {}", subject, op, operand))
        }
        Value::Compare(..) | Value::List(_) => Err(unsupported(operand)),
    }
}

/// Renders the right-hand side of an `UPDATE ... SET` assignment.
///
/// Text is single-quoted unless it is already quoted or looks like a
/// function call ending in `()`.
pub fn render_assignment_value(value: &Value) -> Result<String> {
    match value {
        Value::Text(text) => {
            if text.starts_with('\'') || text.starts_with('"') || text.ends_with("()") {
                Ok(text.clone())
            } else {
                Ok(format!("'{}'", text))
            }
        }
        Value::Null | Value::Bool(_) | Value::Integer(_) | Value::Real(_) => Ok(value.to_string()),
        Value::Compare(..) | Value::List(_) => Err(TabqlError::Value(format!(
            "Unsupported update value: {}",
            value
        ))),
    }
}

fn unsupported(value: &Value) -> TabqlError {
    TabqlError::Value(format!("Unsupported condition: {}", value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_and_false() {
        assert_eq!(render_condition("type", &Value::Null).unwrap(), "type IS NULL");
        assert_eq!(render_condition("type", &false.into()).unwrap(), "type IS NOT NULL");
        assert_eq!(
            render_condition("index", &Option::<i64>::None.into()).unwrap(),
            "\"index\" IS NULL"
        );
    }

    #[test]
    fn test_scalars() {
        assert_eq!(render_condition("index", &3.into()).unwrap(), "\"index\" = 3");
        assert_eq!(render_condition("score", &8.5.into()).unwrap(), "score = 8.5");
        assert_eq!(render_condition("score", &7.0.into()).unwrap(), "score = 7.0");
        assert_eq!(render_condition("active", &true.into()).unwrap(), "active = true");
        assert_eq!(
            render_condition("age_certification", &"R".into()).unwrap(),
            "age_certification = \"R\""
        );
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(
            render_condition("imdb_score", &(">=", 7).into()).unwrap(),
            "imdb_score >= 7"
        );
        assert_eq!(
            render_condition("title", &("<>", "Dark").into()).unwrap(),
            "title <> \"Dark\""
        );
        assert_eq!(
            render_condition("title", &("!=", Value::Null).into()).unwrap(),
            "title IS NOT NULL"
        );
        assert_eq!(
            render_condition("title", &("<>", Value::Null).into()).unwrap(),
            "title IS NOT NULL"
        );
        assert_eq!(
            render_condition("title", &("=", Value::Null).into()).unwrap(),
            "title IS NULL"
        );
    }

    #[test]
    fn test_unsupported_shapes() {
        assert!(matches!(
            render_condition("title", &(">", Value::Null).into()),
            Err(TabqlError::Value(_))
        ));
        match render_condition("id", &vec![1, 2, 3].into()) {
            Err(TabqlError::Value(msg)) => assert_eq!(msg, "Unsupported condition: [1, 2, 3]"),
            other => panic!("Expected value error, got {:?}", other),
        }
        assert!(render_condition("id", &("=", vec![1]).into()).is_err());
    }

    #[test]
    fn test_assignment_values() {
        assert_eq!(render_assignment_value(&"Dark".into()).unwrap(), "'Dark'");
        assert_eq!(render_assignment_value(&"'Dark'".into()).unwrap(), "'Dark'");
        assert_eq!(render_assignment_value(&"\"Dark\"".into()).unwrap(), "\"Dark\"");
        assert_eq!(
            render_assignment_value(&"CURRENT_TIMESTAMP()".into()).unwrap(),
            "CURRENT_TIMESTAMP()"
        );
        assert_eq!(render_assignment_value(&2026.into()).unwrap(), "2026");
        assert_eq!(render_assignment_value(&Value::Null).unwrap(), "NULL");
        assert!(render_assignment_value(&vec!["a"].into()).is_err());
    }
}
