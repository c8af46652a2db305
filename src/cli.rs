//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation. Most flags are optional so that values from
//! `.idrate.toml` apply unless overridden.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// idrate - chart lock-free ID generator throughput
///
/// Reads one result file per (algorithm, thread count) pair written by the
/// snowflake benchmark harness, prints the throughput table and draws one
/// line per algorithm against the thread count.
///
/// Examples:
///   idrate
///   idrate --dir results --max-threads 8 --no-show
///   idrate --algorithms v3a,v3b,v4d --format markdown
///   idrate --save table.txt --chart scaling.svg
///   idrate --check
///   idrate --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Directory containing the result files
    #[arg(short, long, value_name = "DIR", env = "IDRATE_DIR")]
    pub dir: Option<PathBuf>,

    /// Namespace prefix of the result file names (e.g. "lockfree")
    #[arg(long, value_name = "PREFIX")]
    pub prefix: Option<String>,

    /// Operation tag of the result file names (e.g. "get")
    #[arg(long, value_name = "OP")]
    pub operation: Option<String>,

    /// Algorithm labels to include, in legend order (comma-separated)
    ///
    /// Example: --algorithms v2a,v3b,v4d
    #[arg(short, long, value_name = "LIST", value_delimiter = ',')]
    pub algorithms: Option<Vec<String>>,

    /// Lowest thread count to read
    #[arg(long, value_name = "N")]
    pub min_threads: Option<u32>,

    /// Highest thread count to read
    #[arg(long, value_name = "N")]
    pub max_threads: Option<u32>,

    /// Output path for the SVG chart
    #[arg(short = 'o', long, value_name = "FILE")]
    pub chart: Option<PathBuf>,

    /// Format of the table printed to stdout
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Also save the table as plain text (row-major, space-separated)
    #[arg(long, value_name = "FILE")]
    pub save: Option<PathBuf>,

    /// Write the chart without opening it
    #[arg(long)]
    pub no_show: bool,

    /// Command used to open the chart (defaults to the platform opener)
    #[arg(long, value_name = "CMD")]
    pub viewer: Option<String>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .idrate.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Only check which result files exist, then exit
    ///
    /// Exit code 2 when any expected file is missing.
    #[arg(long)]
    pub check: bool,

    /// Generate a default .idrate.toml configuration file
    #[arg(long)]
    pub init_config: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,
}

/// Output format for the printed table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Aligned text grid (default)
    #[default]
    Text,
    /// Markdown table
    Markdown,
    /// JSON with metadata
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(0) = self.min_threads {
            return Err("Thread counts start at 1".to_string());
        }

        if let (Some(min), Some(max)) = (self.min_threads, self.max_threads) {
            if min > max {
                return Err(format!(
                    "--min-threads ({}) must not exceed --max-threads ({})",
                    min, max
                ));
            }
        }

        if let Some(ref algorithms) = self.algorithms {
            if algorithms.iter().any(|a| a.trim().is_empty()) {
                return Err("Algorithm labels must not be empty".to_string());
            }
        }

        // Validate input directory if provided
        if let Some(ref dir) = self.dir {
            if !dir.exists() {
                return Err(format!("Input directory does not exist: {}", dir.display()));
            }
            if !dir.is_dir() {
                return Err(format!("Input path is not a directory: {}", dir.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
