//! Result file loading.
//!
//! Reads one throughput value per (algorithm, thread count) pair from the
//! files the benchmark harness leaves behind and assembles them into a
//! [`ResultTable`]. Reads are sequential and the first failure aborts the
//! whole load.

use crate::error::LoadError;
use crate::models::{InputLayout, ResultTable};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Options controlling a table load.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Show a progress bar while reading.
    pub show_progress: bool,
}

/// Read the throughput value from the first line of a result file.
///
/// Anything after the first line is ignored.
pub fn read_throughput(path: &Path) -> Result<f64, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mut line = String::new();
    let read = BufReader::new(file)
        .read_line(&mut line)
        .map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    if read == 0 {
        return Err(LoadError::Empty {
            path: path.to_path_buf(),
        });
    }

    let token = line.trim();
    token.parse::<f64>().map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        line: token.to_string(),
        source,
    })
}

/// Load the full table described by `layout`.
///
/// Thread counts are the outer loop and algorithms the inner one, so the
/// files are visited in the same order the harness produces them.
pub fn load_table(layout: &InputLayout, options: &LoadOptions) -> Result<ResultTable, LoadError> {
    info!(
        "Loading {} result files from {}",
        layout.file_count(),
        layout.dir.display()
    );

    let progress_bar = if options.show_progress {
        let pb = ProgressBar::new(layout.file_count() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let mut table = ResultTable::zeroed(layout.algorithms.clone(), layout.thread_counts.clone());

    for (i, &threads) in layout.thread_counts.iter().enumerate() {
        for (j, algorithm) in layout.algorithms.iter().enumerate() {
            let path = layout.result_path(algorithm, threads);
            let id_rate = match read_throughput(&path) {
                Ok(v) => v,
                Err(e) => {
                    debug!("Aborting load at {}", e.path().display());
                    if let Some(pb) = &progress_bar {
                        pb.abandon();
                    }
                    return Err(e);
                }
            };
            debug!("{} t={}: {} IDs/ms", algorithm, threads, id_rate);

            table.set(j, i, id_rate);

            if let Some(pb) = &progress_bar {
                pb.set_message(algorithm.clone());
                pb.inc(1);
            }
        }
    }

    if let Some(pb) = progress_bar {
        pb.finish_and_clear();
    }

    info!("Loaded {}x{} result table", table.shape().0, table.shape().1);
    Ok(table)
}

/// Outcome of checking which result files exist.
#[derive(Debug, Clone, Default)]
pub struct InputCheck {
    /// Files that are present.
    pub present: Vec<PathBuf>,
    /// Files that are missing or not regular files.
    pub missing: Vec<PathBuf>,
}

impl InputCheck {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Check which of the expected result files exist, without parsing them.
pub fn check_inputs(layout: &InputLayout) -> InputCheck {
    let mut check = InputCheck::default();

    for path in layout.expected_paths() {
        if path.is_file() {
            check.present.push(path);
        } else {
            debug!("Missing result file: {}", path.display());
            check.missing.push(path);
        }
    }

    check
}
