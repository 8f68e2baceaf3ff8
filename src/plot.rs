//! SVG chart generation for exported results.
//!
//! The first exported column is the x axis and the second the y axis.
//! Charts are drawn with `plotters` on the SVG backend.

use crate::core::{Result, TabqlError};
use plotters::prelude::*;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

const SERIES_COLOR: RGBColor = RGBColor(52, 152, 219);

/// Default chart size in pixels.
pub const DEFAULT_SIZE: (u32, u32) = (1000, 600);

/// The chart styles available for exported results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlotKind {
    #[default]
    Line,
    Bar,
    Scatter,
}

impl fmt::Display for PlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PlotKind::Line => "line",
            PlotKind::Bar => "bar",
            PlotKind::Scatter => "scatter",
        })
    }
}

impl FromStr for PlotKind {
    type Err = TabqlError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "line" => Ok(PlotKind::Line),
            "bar" => Ok(PlotKind::Bar),
            "scatter" => Ok(PlotKind::Scatter),
            other => Err(TabqlError::Value(format!(
                "Unsupported plot kind: {}, supported kinds are 'line', 'bar', 'scatter'.",
                other
            ))),
        }
    }
}

/// Points extracted from the first two columns of a result.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<(f64, f64)>,
    /// Category names when the x column is not numeric; point `i` of a
    /// category sits at x = its index here.
    pub categories: Option<Vec<String>>,
}

impl ChartData {
    /// Builds chart data from a header row and text rows.
    ///
    /// Rows whose y value is not a finite number are skipped. An x column
    /// with any non-finite or non-numeric value is plotted as categories.
    ///
    /// # Errors
    ///
    /// `TabqlError::Value` with fewer than two columns, or when no row has
    /// a numeric y value.
    pub fn from_columns<S: AsRef<str>>(headers: &[String], rows: &[Vec<S>]) -> Result<Self> {
        if headers.len() < 2 {
            return Err(TabqlError::Value(
                "Expected at least two columns for plotting.".to_string(),
            ));
        }

        let mut pairs = Vec::with_capacity(rows.len());
        let mut skipped = 0usize;
        for row in rows {
            let x = row.first().map_or("", |v| v.as_ref().trim());
            match row.get(1).and_then(|v| parse_finite(v.as_ref())) {
                Some(y) => pairs.push((x, y)),
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            warn!(skipped, column = %headers[1], "skipped rows without a numeric y value");
        }
        if pairs.is_empty() {
            return Err(TabqlError::Value(format!(
                "Column '{}' has no numeric values to plot.",
                headers[1]
            )));
        }

        let numeric_x: Option<Vec<f64>> = pairs.iter().map(|(x, _)| parse_finite(x)).collect();
        let (points, categories) = match numeric_x {
            Some(xs) => (xs.into_iter().zip(pairs.iter().map(|(_, y)| *y)).collect(), None),
            None => {
                let mut categories: Vec<String> = Vec::new();
                let mut points = Vec::with_capacity(pairs.len());
                for (x, y) in &pairs {
                    let index = match categories.iter().position(|c| c == x) {
                        Some(index) => index,
                        None => {
                            categories.push((*x).to_string());
                            categories.len() - 1
                        }
                    };
                    points.push((index as f64, *y));
                }
                (points, Some(categories))
            }
        };

        Ok(ChartData {
            x_label: headers[0].clone(),
            y_label: headers[1].clone(),
            points,
            categories,
        })
    }

    /// Title used when none is given: `"<y> vs <x>"`.
    pub fn default_title(&self) -> String {
        format!("{} vs {}", self.y_label, self.x_label)
    }

    fn x_range(&self, kind: PlotKind) -> std::ops::Range<f64> {
        if let Some(categories) = &self.categories {
            return -0.5..(categories.len() as f64 - 0.5);
        }
        let (min, max) = bounds(self.points.iter().map(|(x, _)| *x));
        let pad = if kind == PlotKind::Bar {
            0.5f64.max((max - min) * 0.05)
        } else if max > min {
            (max - min) * 0.05
        } else {
            1.0
        };
        (min - pad)..(max + pad)
    }

    fn y_range(&self, kind: PlotKind) -> std::ops::Range<f64> {
        let (mut min, mut max) = bounds(self.points.iter().map(|(_, y)| *y));
        if kind == PlotKind::Bar {
            min = min.min(0.0);
            max = max.max(0.0);
        }
        let pad = if max > min { (max - min) * 0.1 } else { 1.0 };
        (min - pad)..(max + pad)
    }
}

/// Parses a finite number; `inf` and `NaN` count as non-numeric.
fn parse_finite(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)))
}

/// Draws `data` as a chart of `kind` and saves it as an SVG file.
pub fn render_svg(data: &ChartData, kind: PlotKind, title: &str, size: (u32, u32), output: &Path) -> Result<()> {
    draw(data, kind, title, size, output).map_err(|e| TabqlError::Chart(e.to_string()))?;
    info!(path = %output.display(), kind = %kind, "Saved chart");
    Ok(())
}

fn draw(
    data: &ChartData,
    kind: PlotKind,
    title: &str,
    size: (u32, u32),
    output: &Path,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let root = SVGBackend::new(output, size).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 20))
        .margin(14)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(data.x_range(kind), data.y_range(kind))?;

    let category_label = |x: &f64| -> String {
        let nearest = x.round();
        match &data.categories {
            Some(categories) if (x - nearest).abs() < 1e-6 && nearest >= 0.0 => categories
                .get(nearest as usize)
                .cloned()
                .unwrap_or_default(),
            _ => String::new(),
        }
    };

    {
        let mut mesh = chart.configure_mesh();
        mesh.x_desc(data.x_label.as_str()).y_desc(data.y_label.as_str());
        if let Some(categories) = &data.categories {
            mesh.x_labels(categories.len()).x_label_formatter(&category_label);
        }
        mesh.draw()?;
    }

    let points = &data.points;
    match kind {
        PlotKind::Line => {
            chart.draw_series(LineSeries::new(points.iter().copied(), SERIES_COLOR.stroke_width(2)))?;
            chart.draw_series(
                points
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), 4, SERIES_COLOR.filled())),
            )?;
        }
        PlotKind::Scatter => {
            chart.draw_series(
                points
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), 4, SERIES_COLOR.filled())),
            )?;
        }
        PlotKind::Bar => {
            chart.draw_series(
                points
                    .iter()
                    .map(|&(x, y)| Rectangle::new([(x - 0.4, 0.0), (x + 0.4, y)], SERIES_COLOR.filled())),
            )?;
        }
    }

    root.present()?;
    Ok(())
}
