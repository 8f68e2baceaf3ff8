use crate::builder::Dialect;
use crate::core::{Result, TabqlError};
use crate::output::ExportOptions;
use crate::plot;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Database file used when neither the command line nor the config names one.
pub const DEFAULT_DB_PATH: &str = "my_database.db";

/// Top-level configuration structure parsed from a TOML file.
#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct Config {
    pub database: Option<DatabaseConfig>,
    pub output: Option<OutputConfig>,
}

/// Database-related configuration.
#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct DatabaseConfig {
    pub path: Option<String>,
    pub dialect: Option<String>,
}

/// Export-related configuration.
#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct OutputConfig {
    pub directory: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl Config {
    /// `<config_dir>/tabql/config.toml`, when the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tabql").join("config.toml"))
    }

    /// Loads the default config file, or an empty config if there is none.
    pub fn load_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => load_config(path),
            _ => {
                debug!("no config file found, using defaults");
                Ok(Config::default())
            }
        }
    }

    pub fn db_path(&self) -> &str {
        self.database
            .as_ref()
            .and_then(|db| db.path.as_deref())
            .unwrap_or(DEFAULT_DB_PATH)
    }

    /// The configured dialect, SQLite when unset.
    pub fn dialect(&self) -> Result<Dialect> {
        match self.database.as_ref().and_then(|db| db.dialect.as_deref()) {
            Some(name) => name.parse(),
            None => Ok(Dialect::default()),
        }
    }

    pub fn export_options(&self) -> ExportOptions {
        let output = self.output.as_ref();
        let (default_width, default_height) = plot::DEFAULT_SIZE;
        ExportOptions {
            directory: output
                .and_then(|o| o.directory.as_deref())
                .map_or_else(|| PathBuf::from("."), PathBuf::from),
            figsize: (
                output.and_then(|o| o.width).unwrap_or(default_width),
                output.and_then(|o| o.height).unwrap_or(default_height),
            ),
        }
    }
}

/// Loads configuration from a TOML file at the given path.
///
/// # Arguments
///
/// * `path` - The file path to the TOML configuration file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        TabqlError::Configuration(format!("Cannot read {}: {}", path.display(), e))
    })?;
    toml::from_str(&content).map_err(|e| TabqlError::Configuration(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CONFIG: &str = r#"
[database]
path = "netflix.db"
dialect = "postgresql"

[output]
directory = "reports"
width = 800
"#;

    #[test]
    fn test_load_config_from_str() {
        let config: Config = toml::from_str(SAMPLE_CONFIG).expect("Failed to parse sample config");
        assert_eq!(config.db_path(), "netflix.db");
        assert_eq!(config.dialect().unwrap(), Dialect::Postgresql);

        let options = config.export_options();
        assert_eq!(options.directory, PathBuf::from("reports"));
        assert_eq!(options.figsize, (800, plot::DEFAULT_SIZE.1));
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.db_path(), DEFAULT_DB_PATH);
        assert_eq!(config.dialect().unwrap(), Dialect::Sqlite);
        assert_eq!(config.export_options(), ExportOptions::default());
    }

    #[test]
    fn test_invalid_dialect_and_file() {
        let config: Config = toml::from_str("[database]\ndialect = \"oracle\"\n").unwrap();
        assert!(matches!(config.dialect(), Err(TabqlError::Configuration(_))));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[database\npath = 1").unwrap();
        assert!(matches!(load_config(&path), Err(TabqlError::Configuration(_))));
        assert!(matches!(
            load_config(dir.path().join("missing.toml")),
            Err(TabqlError::Configuration(_))
        ));
    }
}
