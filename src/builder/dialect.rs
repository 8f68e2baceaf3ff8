use crate::core::{Result, TabqlError};
use std::fmt;
use std::str::FromStr;

/// Target SQL variant for a builder.
///
/// Rendering is identical across dialects today; the reserved-word set is
/// SQLite's for all three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    #[default]
    Sqlite,
    Mysql,
    Postgresql,
}

impl Dialect {
    /// All supported dialects.
    pub const ALL: [Dialect; 3] = [Dialect::Sqlite, Dialect::Mysql, Dialect::Postgresql];

    /// Lower-case name as accepted by `FromStr`.
    pub fn name(self) -> &'static str {
        match self {
            Dialect::Sqlite => "sqlite",
            Dialect::Mysql => "mysql",
            Dialect::Postgresql => "postgresql",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = TabqlError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Dialect::Sqlite),
            "mysql" => Ok(Dialect::Mysql),
            "postgresql" => Ok(Dialect::Postgresql),
            other => Err(TabqlError::Configuration(format!(
                "Unsupported dialect: '{}'. Supported dialects: sqlite, mysql, postgresql",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dialects() {
        for dialect in Dialect::ALL {
            assert_eq!(dialect.name().parse::<Dialect>().unwrap(), dialect);
        }
        assert_eq!("SQLite".parse::<Dialect>().unwrap(), Dialect::Sqlite);
        assert_eq!(Dialect::default(), Dialect::Sqlite);
    }

    #[test]
    fn test_unknown_dialect_is_configuration_error() {
        match "oracle".parse::<Dialect>() {
            Err(TabqlError::Configuration(msg)) => assert!(msg.contains("oracle")),
            other => panic!("Expected configuration error, got {:?}", other),
        }
    }
}
