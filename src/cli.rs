use crate::builder::StatementBuilder;
use crate::config::{load_config, Config};
use crate::core::db::ExecutionOutcome;
use crate::core::{Result, TabqlError};
use crate::engine::DataEngine;
use crate::output::DataOutput;
use crate::plot::PlotKind;
use crate::results_grid::ResultsGrid;
use tracing::info;

pub const USAGE: &str = "\
Usage: tabql [--db PATH] [--config PATH] <command>

Commands:
  import <csv> [table]            Import a CSV file, replacing the table
  tables                          List tables
  schema <table>                  Show column names and types
  query <sql> [output]            Run a statement; export it as <output>.csv
  plot <output> [kind] [title]    Chart <output>.csv (line, bar or scatter)
  demo <csv>                      Import a CSV and export a sample aggregate
  help                            Show this message
";

/// Represents a parsed command.
#[derive(Debug, PartialEq)]
pub enum Command {
    Import { csv: String, table: Option<String> },
    Tables,
    Schema(String),
    Query { sql: String, output: Option<String> },
    Plot { output: String, kind: String, title: Option<String> },
    Demo(String),
    Help,
    Unknown(String),
}

/// A command plus the global options given before it.
#[derive(Debug, PartialEq)]
pub struct Invocation {
    pub db_path: Option<String>,
    pub config_path: Option<String>,
    pub command: Command,
}

/// Parses the arguments that follow the program name.
pub fn parse_args<I>(args: I) -> Invocation
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    let mut args: Vec<String> = args.into_iter().map(Into::into).collect();
    let mut db_path = None;
    let mut config_path = None;

    while args.len() >= 2 && (args[0] == "--db" || args[0] == "--config") {
        let flag = args.remove(0);
        let value = args.remove(0);
        if flag == "--db" {
            db_path = Some(value);
        } else {
            config_path = Some(value);
        }
    }

    Invocation {
        db_path,
        config_path,
        command: parse_command(&args),
    }
}

fn parse_command(parts: &[String]) -> Command {
    let Some(name) = parts.first() else {
        return Command::Help;
    };
    let arg = |i: usize| parts.get(i).cloned();
    match name.as_str() {
        "import" => match arg(1) {
            Some(csv) => Command::Import { csv, table: arg(2) },
            None => Command::Unknown(parts.join(" ")),
        },
        "tables" => Command::Tables,
        "schema" => match arg(1) {
            Some(table) => Command::Schema(table),
            None => Command::Unknown(parts.join(" ")),
        },
        "query" => match arg(1) {
            Some(sql) => Command::Query { sql, output: arg(2) },
            None => Command::Unknown(parts.join(" ")),
        },
        "plot" => match arg(1) {
            Some(output) => Command::Plot {
                output,
                kind: arg(2).unwrap_or_else(|| PlotKind::default().to_string()),
                title: arg(3),
            },
            None => Command::Unknown(parts.join(" ")),
        },
        "demo" => match arg(1) {
            Some(csv) => Command::Demo(csv),
            None => Command::Unknown(parts.join(" ")),
        },
        "help" | "--help" | "-h" => Command::Help,
        _ => Command::Unknown(parts.join(" ")),
    }
}

/// Runs an invocation and returns the text to print.
pub fn run(invocation: Invocation) -> Result<String> {
    let config = match &invocation.config_path {
        Some(path) => load_config(path)?,
        None => Config::load_default()?,
    };
    let dialect = config.dialect()?;
    let db_path = invocation
        .db_path
        .clone()
        .unwrap_or_else(|| config.db_path().to_string());
    let options = config.export_options();

    match invocation.command {
        Command::Import { csv, table } => {
            let mut engine = DataEngine::open(&db_path)?;
            let table = engine.import_csv(&csv, table.as_deref())?;
            engine.close()?;
            Ok(format!("Imported '{}' into table '{}'\n", csv, table))
        }
        Command::Tables => {
            let engine = DataEngine::open(&db_path)?;
            let tables = engine.list_tables()?;
            engine.close()?;
            Ok(tables.iter().map(|t| format!("{}\n", t)).collect())
        }
        Command::Schema(table) => {
            let engine = DataEngine::open(&db_path)?;
            let columns = engine.get_schema(&table)?;
            engine.close()?;
            Ok(columns
                .iter()
                .map(|c| format!("{} {}\n", c.name, c.type_name))
                .collect())
        }
        Command::Query { sql, output: Some(output) } => {
            let exported = DataOutput::run(&db_path, &sql, &output, options)?;
            let grid = ResultsGrid::from_result(&exported.result());
            Ok(format!("{}Exported to {}\n", grid.render(), exported.csv_path().display()))
        }
        Command::Query { sql, output: None } => {
            let engine = DataEngine::open(&db_path)?;
            let outcome = engine.execute(&sql)?;
            engine.close()?;
            Ok(match outcome {
                ExecutionOutcome::Rows(result) => ResultsGrid::from_result(&result).render(),
                ExecutionOutcome::Affected(n) => format!("{} rows affected\n", n),
            })
        }
        Command::Plot { output, kind, title } => {
            let kind: PlotKind = kind.parse()?;
            let path = DataOutput::existing(&output, options).plot(kind, title.as_deref())?;
            Ok(format!("Saved chart to {}\n", path.display()))
        }
        Command::Demo(csv) => {
            let mut engine = DataEngine::open(&db_path)?;
            let table = engine.import_csv(&csv, None)?;
            engine.close()?;

            let query = demo_query(&table, dialect)?;
            info!(sql = %query, "running demo query");
            let exported = DataOutput::run(&db_path, &query, "output_avg_index", options)?;
            let grid = ResultsGrid::from_result(&exported.result());
            Ok(format!(
                "{}\n{}Exported to {}\n",
                query,
                grid.render(),
                exported.csv_path().display()
            ))
        }
        Command::Help => Ok(USAGE.to_string()),
        Command::Unknown(input) => Err(TabqlError::Value(format!(
            "Unknown command: '{}'. Run 'tabql help' for usage.",
            input
        ))),
    }
}

/// Average `index` per `type` for rows with a type and an index of at
/// least 7, best five first.
pub fn demo_query(table: &str, dialect: crate::builder::Dialect) -> Result<String> {
    let subquery = StatementBuilder::for_dialect(table, dialect)
        .select(["index"])
        .render();
    Ok(StatementBuilder::for_dialect(table, dialect)
        .select([("AVG(index)", "avg_index")])
        .where_("type", false)?
        .and_("index", (">=", 7))?
        .group_by(["type"])
        .order_by(["avg_index"], true)
        .limit(5)
        .exists_(subquery)?
        .render())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_global_options() {
        let invocation = parse_args(args(&["--db", "shows.db", "--config", "c.toml", "tables"]));
        assert_eq!(invocation.db_path.as_deref(), Some("shows.db"));
        assert_eq!(invocation.config_path.as_deref(), Some("c.toml"));
        assert_eq!(invocation.command, Command::Tables);
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            parse_args(args(&["import", "data.csv"])).command,
            Command::Import { csv: "data.csv".to_string(), table: None }
        );
        assert_eq!(
            parse_args(args(&["query", "SELECT 1;", "out"])).command,
            Command::Query { sql: "SELECT 1;".to_string(), output: Some("out".to_string()) }
        );
        assert_eq!(
            parse_args(args(&["plot", "out"])).command,
            Command::Plot { output: "out".to_string(), kind: "line".to_string(), title: None }
        );
        assert_eq!(parse_args(Vec::<String>::new()).command, Command::Help);
        assert_eq!(
            parse_args(args(&["schema"])).command,
            Command::Unknown("schema".to_string())
        );
        assert_eq!(
            parse_args(args(&["frobnicate", "x"])).command,
            Command::Unknown("frobnicate x".to_string())
        );
    }

    #[test]
    fn test_demo_query() {
        let sql = demo_query("NetflixTVShowsAndMovies", crate::builder::Dialect::Sqlite).unwrap();
        assert_eq!(
            sql,
            "SELECT AVG(\"index\") AS avg_index FROM NetflixTVShowsAndMovies \
             WHERE type IS NOT NULL AND \"index\" >= 7 AND EXISTS (SELECT \"index\" FROM NetflixTVShowsAndMovies) \
             GROUP BY type ORDER BY avg_index DESC LIMIT 5;"
        );
    }
}
