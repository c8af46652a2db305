//! Result table rendering.
//!
//! This module renders a loaded [`ResultTable`] as an aligned text grid,
//! a Markdown table or JSON, and writes the plain-text save format.

use crate::models::{Report, ResultTable, TableMetadata};
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

/// Generate an aligned text grid, one row per algorithm.
///
/// Values use the shortest form that parses back to the same `f64`.
pub fn generate_text_report(table: &ResultTable) -> String {
    let label_width = table
        .algorithms
        .iter()
        .map(|a| a.len())
        .chain(std::iter::once("algorithm".len()))
        .max()
        .unwrap_or(0);

    let cells: Vec<Vec<String>> = table
        .values
        .iter()
        .map(|row| row.iter().map(|v| v.to_string()).collect())
        .collect();

    let headers: Vec<String> = table
        .thread_counts
        .iter()
        .map(|t| format!("t={}", t))
        .collect();

    // Each column is as wide as its widest cell or header.
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            cells
                .iter()
                .filter_map(|row| row.get(i).map(String::len))
                .chain(std::iter::once(h.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut output = String::new();

    output.push_str(&format!("{:<width$}", "algorithm", width = label_width));
    for (h, w) in headers.iter().zip(&widths) {
        output.push_str(&format!("  {:>width$}", h, width = *w));
    }
    output.push('\n');

    for (algorithm, row) in table.algorithms.iter().zip(&cells) {
        output.push_str(&format!("{:<width$}", algorithm, width = label_width));
        for (cell, w) in row.iter().zip(&widths) {
            output.push_str(&format!("  {:>width$}", cell, width = *w));
        }
        output.push('\n');
    }

    output
}

/// Generate a Markdown table.
pub fn generate_markdown_report(table: &ResultTable) -> String {
    let mut output = String::new();

    output.push_str("| Algorithm |");
    for t in &table.thread_counts {
        output.push_str(&format!(" t={} |", t));
    }
    output.push('\n');

    output.push_str("|:---|");
    for _ in &table.thread_counts {
        output.push_str("---:|");
    }
    output.push('\n');

    for (algorithm, row) in table.algorithms.iter().zip(&table.values) {
        output.push_str(&format!("| `{}` |", algorithm));
        for v in row {
            output.push_str(&format!(" {} |", v));
        }
        output.push('\n');
    }

    output
}

/// Generate a JSON report including provenance metadata.
pub fn generate_json_report(table: &ResultTable, metadata: &TableMetadata) -> Result<String> {
    let report = Report {
        metadata: metadata.clone(),
        table: table.clone(),
    };
    serde_json::to_string_pretty(&report).map_err(Into::into)
}

/// Render the table in the plain-text save format.
///
/// Row-major: one line per algorithm, values separated by single spaces.
pub fn generate_saved_table(table: &ResultTable) -> String {
    let mut output = String::new();

    for row in &table.values {
        let line: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        output.push_str(&line.join(" "));
        output.push('\n');
    }

    output
}

/// Write the table to `path` in the plain-text save format.
pub fn save_table(table: &ResultTable, path: &Path) -> Result<()> {
    let content = generate_saved_table(table);

    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(())
}
