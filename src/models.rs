//! Data models for the throughput aggregator.
//!
//! This module contains the core data structures used throughout
//! the application: the input layout that names every result file,
//! and the result table that the loader fills in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where the benchmark harness wrote its results and how it named them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputLayout {
    /// Directory holding the result files.
    pub dir: PathBuf,
    /// Namespace prefix of the algorithm (e.g. "lockfree").
    pub prefix: String,
    /// Operation tag measured by the harness (e.g. "get").
    pub operation: String,
    /// Algorithm labels, in row order.
    pub algorithms: Vec<String>,
    /// Thread counts, ascending, in column order.
    pub thread_counts: Vec<u32>,
}

impl InputLayout {
    /// Path of the result file for one (algorithm, thread count) pair.
    ///
    /// `<dir>/<prefix>::<algorithm>::<operation>-t<threads>.txt`
    pub fn result_path(&self, algorithm: &str, threads: u32) -> PathBuf {
        self.dir.join(format!(
            "{}::{}::{}-t{}.txt",
            self.prefix, algorithm, self.operation, threads
        ))
    }

    /// Every expected result path, thread count outermost.
    pub fn expected_paths(&self) -> Vec<PathBuf> {
        self.thread_counts
            .iter()
            .flat_map(|&t| self.algorithms.iter().map(move |a| self.result_path(a, t)))
            .collect()
    }

    /// Number of files a full load reads.
    pub fn file_count(&self) -> usize {
        self.algorithms.len() * self.thread_counts.len()
    }
}

/// Dense algorithm x thread-count matrix of throughput values (IDs/ms).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultTable {
    /// Row labels.
    pub algorithms: Vec<String>,
    /// Column labels.
    pub thread_counts: Vec<u32>,
    /// `values[j][i]` is algorithm `j` at `thread_counts[i]`.
    pub values: Vec<Vec<f64>>,
}

impl ResultTable {
    /// Creates a zero-filled table with the given labels.
    pub fn zeroed(algorithms: Vec<String>, thread_counts: Vec<u32>) -> Self {
        let values = vec![vec![0.0; thread_counts.len()]; algorithms.len()];
        Self {
            algorithms,
            thread_counts,
            values,
        }
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.algorithms.len(), self.thread_counts.len())
    }

    /// Value at row `j`, column `i`.
    #[cfg(test)]
    pub fn get(&self, j: usize, i: usize) -> Option<f64> {
        self.values.get(j).and_then(|row| row.get(i)).copied()
    }

    /// Sets the value at row `j`, column `i`.
    ///
    /// Panics if the cell is outside the table.
    pub fn set(&mut self, j: usize, i: usize, value: f64) {
        self.values[j][i] = value;
    }

    /// The full row of one algorithm.
    pub fn row(&self, j: usize) -> &[f64] {
        &self.values[j]
    }

    /// (thread count, value) pairs of one row, ready for plotting.
    pub fn series(&self, j: usize) -> Vec<(u32, f64)> {
        self.thread_counts
            .iter()
            .copied()
            .zip(self.row(j).iter().copied())
            .collect()
    }

    /// Smallest and largest finite value, or `None` if there are none.
    pub fn finite_bounds(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .flatten()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// Provenance of a loaded table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableMetadata {
    /// Directory the results were read from.
    pub input_dir: String,
    /// When the table was assembled.
    pub generated_at: DateTime<Utc>,
    /// Number of result files read.
    pub files_read: usize,
}

impl TableMetadata {
    pub fn new(input_dir: &Path, files_read: usize) -> Self {
        Self {
            input_dir: input_dir.display().to_string(),
            generated_at: Utc::now(),
            files_read,
        }
    }
}

/// A table together with its metadata, as serialized in JSON reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub metadata: TableMetadata,
    #[serde(flatten)]
    pub table: ResultTable,
}
