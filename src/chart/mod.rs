//! Throughput chart rendering.
//!
//! Draws one line per algorithm against the thread-count axis and writes
//! the chart as SVG using plotters.

pub mod viewer;

pub use viewer::show;

use crate::models::ResultTable;
use anyhow::{bail, Result};
use plotters::prelude::*;
use std::path::PathBuf;
use tracing::{debug, info};

/// Options for rendering a chart.
#[derive(Debug, Clone)]
pub struct ChartOptions {
    /// Where the SVG is written.
    pub output: PathBuf,
    /// Chart caption.
    pub title: String,
    /// X axis description.
    pub x_label: String,
    /// Y axis description.
    pub y_label: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            output: PathBuf::from("id_throughput.svg"),
            title: "ID Throughput".to_string(),
            x_label: "Thread Count".to_string(),
            y_label: "IDs/ms".to_string(),
            width: 1024,
            height: 768,
        }
    }
}

impl From<&crate::config::ChartConfig> for ChartOptions {
    fn from(config: &crate::config::ChartConfig) -> Self {
        Self {
            output: PathBuf::from(&config.output),
            title: config.title.clone(),
            x_label: config.x_label.clone(),
            y_label: config.y_label.clone(),
            width: config.width,
            height: config.height,
        }
    }
}

/// X axis range covering every thread count.
fn x_range(thread_counts: &[u32]) -> std::ops::Range<u32> {
    let lo = thread_counts.iter().copied().min().unwrap_or(1);
    let hi = thread_counts.iter().copied().max().unwrap_or(lo);
    if hi > lo {
        lo..hi
    } else if lo < u32::MAX {
        lo..lo + 1
    } else {
        lo - 1..lo
    }
}

/// Y axis range from zero (or the lowest value) to just above the highest.
fn y_range(table: &ResultTable) -> std::ops::Range<f64> {
    let (lo, hi) = table.finite_bounds().unwrap_or((0.0, 0.0));
    let y_lo = lo.min(0.0);
    let y_hi = (hi * 1.1).max(1.0);
    y_lo..y_hi
}

/// Render the throughput chart to `options.output`.
pub fn render_chart(table: &ResultTable, options: &ChartOptions) -> Result<()> {
    let (rows, cols) = table.shape();
    if rows == 0 || cols == 0 {
        bail!("Cannot chart an empty result table");
    }

    info!("Rendering chart to {}", options.output.display());

    let root =
        SVGBackend::new(&options.output, (options.width, options.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&options.title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range(&table.thread_counts), y_range(table))?;

    chart
        .configure_mesh()
        .x_desc(options.x_label.as_str())
        .y_desc(options.y_label.as_str())
        .x_labels(cols.min(32))
        .draw()?;

    for (j, algorithm) in table.algorithms.iter().enumerate() {
        let color = Palette99::pick(j).to_rgba();
        let points: Vec<(u32, f64)> = table
            .series(j)
            .into_iter()
            .filter(|(_, v)| v.is_finite())
            .collect();
        debug!("Plotting {} ({} points)", algorithm, points.len());

        chart
            .draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))?
            .label(algorithm.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));

        chart.draw_series(
            points
                .into_iter()
                .map(|p| TriangleMarker::new(p, 5, color.filled())),
        )?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_table() -> ResultTable {
        let thread_counts: Vec<u32> = (1..=16).collect();
        let rising: Vec<f64> = thread_counts.iter().map(|&t| t as f64 * 1.5).collect();
        ResultTable {
            algorithms: vec!["v2a".to_string(), "v3b".to_string(), "v4d".to_string()],
            thread_counts,
            values: vec![rising, vec![1.0; 16], vec![1.0; 16]],
        }
    }

    #[test]
    fn test_x_range() {
        assert_eq!(x_range(&[1, 2, 16]), 1..16);
        assert_eq!(x_range(&[4]), 4..5);
        assert_eq!(x_range(&[u32::MAX]), u32::MAX - 1..u32::MAX);
    }

    #[test]
    fn test_y_range_starts_at_zero() {
        let range = y_range(&create_test_table());
        assert_eq!(range.start, 0.0);
        assert!(range.end > 24.0);
    }

    #[test]
    fn test_y_range_all_zero() {
        let table = ResultTable::zeroed(vec!["a".to_string()], vec![1, 2]);
        assert_eq!(y_range(&table), 0.0..1.0);
    }

    #[test]
    fn test_render_chart_writes_svg() {
        let temp_dir = TempDir::new().unwrap();
        let options = ChartOptions {
            output: temp_dir.path().join("chart.svg"),
            ..ChartOptions::default()
        };

        render_chart(&create_test_table(), &options).unwrap();

        let svg = std::fs::read_to_string(&options.output).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("ID Throughput"));
        assert!(svg.contains("Thread Count"));
        assert!(svg.contains("IDs/ms"));
        for algorithm in ["v2a", "v3b", "v4d"] {
            assert!(svg.contains(algorithm));
        }
    }

    #[test]
    fn test_render_empty_table_fails() {
        let temp_dir = TempDir::new().unwrap();
        let options = ChartOptions {
            output: temp_dir.path().join("chart.svg"),
            ..ChartOptions::default()
        };

        let table = ResultTable::zeroed(vec![], vec![]);
        assert!(render_chart(&table, &options).is_err());
        assert!(!options.output.exists());
    }
}
