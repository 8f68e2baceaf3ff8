use crate::core::db::QueryResult;

/// Results Grid Module for TABQL
///
/// Renders query results as a plain-text table for the terminal. Only the
/// first `max_rows` rows are shown; a footer reports how many were hidden.

/// Represents the entire grid structure.
#[derive(Debug, Clone)]
pub struct ResultsGrid {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub max_rows: usize,
}

impl Default for ResultsGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultsGrid {
    /// Creates a new, empty ResultsGrid showing at most 50 rows.
    pub fn new() -> Self {
        ResultsGrid {
            headers: Vec::new(),
            rows: Vec::new(),
            max_rows: 50,
        }
    }

    /// Creates a grid holding the display form of a query result.
    pub fn from_result(result: &QueryResult) -> Self {
        let mut grid = ResultsGrid::new();
        grid.set_headers(result.columns.clone());
        for row in result.display_rows() {
            grid.add_row(row);
        }
        grid
    }

    /// Sets the headers for the grid.
    pub fn set_headers(&mut self, headers: Vec<String>) {
        self.headers = headers;
    }

    /// Adds a row to the grid.
    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    fn column_widths(&self, visible: &[Vec<String>]) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in visible {
            for (i, cell) in row.iter().enumerate() {
                let len = cell.chars().count();
                match widths.get_mut(i) {
                    Some(width) => *width = (*width).max(len),
                    None => widths.push(len),
                }
            }
        }
        widths
    }

    /// Renders the grid with padded columns separated by `|`.
    pub fn render(&self) -> String {
        let visible = &self.rows[..self.rows.len().min(self.max_rows)];
        let widths = self.column_widths(visible);
        let format_line = |cells: &[String]| -> String {
            cells
                .iter()
                .enumerate()
                .map(|(i, cell)| format!("{:<width$}", cell, width = widths.get(i).copied().unwrap_or(0)))
                .collect::<Vec<_>>()
                .join(" | ")
                .trim_end()
                .to_string()
        };

        let mut output = String::new();
        if !self.headers.is_empty() {
            output.push_str(&format_line(&self.headers));
            output.push('\n');
            let underline: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
            output.push_str(&underline.join("-|-"));
            output.push('\n');
        }
        for row in visible {
            output.push_str(&format_line(row));
            output.push('\n');
        }
        let hidden = self.rows.len() - visible.len();
        if hidden > 0 {
            output.push_str(&format!("... {} more rows\n", hidden));
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::types::Value;

    #[test]
    fn test_render_empty_grid() {
        let grid = ResultsGrid::new();
        assert_eq!(grid.render(), "");
    }

    #[test]
    fn test_render_with_headers_and_rows() {
        let mut grid = ResultsGrid::new();
        grid.set_headers(vec!["ID".to_string(), "Name".to_string()]);
        grid.add_row(vec!["1".to_string(), "Alice".to_string()]);
        grid.add_row(vec!["22".to_string(), "Bob".to_string()]);
        assert_eq!(
            grid.render(),
            "ID | Name\n---|------\n1  | Alice\n22 | Bob\n"
        );
    }

    #[test]
    fn test_from_result_and_truncation() {
        let rows = (0..3).map(|i| vec![Value::Integer(i), Value::Null]).collect();
        let result = QueryResult::new(vec!["index".to_string(), "title".to_string()], rows);
        let mut grid = ResultsGrid::from_result(&result);
        grid.max_rows = 2;

        let rendered = grid.render();
        assert!(rendered.contains("0     | NULL"));
        assert!(!rendered.contains("2     | NULL"));
        assert!(rendered.ends_with("... 1 more rows\n"));
    }
}
