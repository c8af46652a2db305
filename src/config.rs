//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.idrate.toml` files.

use crate::cli::{Args, OutputFormat};
use crate::models::InputLayout;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = ".idrate.toml";

/// Highest thread count accepted for `max_threads`.
pub const MAX_THREADS: u32 = 4096;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Where the result files are and how they are named.
    #[serde(default)]
    pub input: InputConfig,

    /// Chart settings.
    #[serde(default)]
    pub chart: ChartConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Result file location and naming.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Directory holding the result files.
    #[serde(default = "default_dir")]
    pub dir: String,

    /// Namespace prefix in the file name.
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Operation tag in the file name.
    #[serde(default = "default_operation")]
    pub operation: String,

    /// Algorithm labels, in row order.
    #[serde(default = "default_algorithms")]
    pub algorithms: Vec<String>,

    /// Lowest thread count (inclusive).
    #[serde(default = "default_min_threads")]
    pub min_threads: u32,

    /// Highest thread count (inclusive).
    #[serde(default = "default_max_threads")]
    pub max_threads: u32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            prefix: default_prefix(),
            operation: default_operation(),
            algorithms: default_algorithms(),
            min_threads: default_min_threads(),
            max_threads: default_max_threads(),
        }
    }
}

fn default_dir() -> String {
    "out".to_string()
}

fn default_prefix() -> String {
    "lockfree".to_string()
}

fn default_operation() -> String {
    "get".to_string()
}

fn default_algorithms() -> Vec<String> {
    vec!["v2a", "v2b", "v3a", "v3b", "v3c", "v3d", "v4b", "v4c", "v4d"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_min_threads() -> u32 {
    1
}

fn default_max_threads() -> u32 {
    16
}

/// Chart rendering and display settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    /// SVG output path.
    #[serde(default = "default_chart_output")]
    pub output: String,

    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_x_label")]
    pub x_label: String,

    #[serde(default = "default_y_label")]
    pub y_label: String,

    #[serde(default = "default_width")]
    pub width: u32,

    #[serde(default = "default_height")]
    pub height: u32,

    /// Open the chart in a viewer and wait for it to close.
    #[serde(default = "default_true")]
    pub show: bool,

    /// Viewer command; the platform default when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewer: Option<String>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            output: default_chart_output(),
            title: default_title(),
            x_label: default_x_label(),
            y_label: default_y_label(),
            width: default_width(),
            height: default_height(),
            show: true,
            viewer: None,
        }
    }
}

fn default_chart_output() -> String {
    "id_throughput.svg".to_string()
}

fn default_title() -> String {
    "ID Throughput".to_string()
}

fn default_x_label() -> String {
    "Thread Count".to_string()
}

fn default_y_label() -> String {
    "IDs/ms".to_string()
}

fn default_width() -> u32 {
    1024
}

fn default_height() -> u32 {
    768
}

fn default_true() -> bool {
    true
}

/// Report settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Format of the table printed to stdout.
    #[serde(default)]
    pub format: OutputFormat,

    /// Save the table as plain text to this path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub save: Option<String>,
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// Only values given explicitly on the command line override.
    pub fn merge_with_args(&mut self, args: &Args) {
        if let Some(ref dir) = args.dir {
            self.input.dir = dir.display().to_string();
        }
        if let Some(ref prefix) = args.prefix {
            self.input.prefix = prefix.clone();
        }
        if let Some(ref operation) = args.operation {
            self.input.operation = operation.clone();
        }
        if let Some(ref algorithms) = args.algorithms {
            self.input.algorithms = algorithms.clone();
        }
        if let Some(min) = args.min_threads {
            self.input.min_threads = min;
        }
        if let Some(max) = args.max_threads {
            self.input.max_threads = max;
        }

        if let Some(ref chart) = args.chart {
            self.chart.output = chart.display().to_string();
        }
        if let Some(ref viewer) = args.viewer {
            self.chart.viewer = Some(viewer.clone());
        }
        // Flags always override
        if args.no_show {
            self.chart.show = false;
        }

        if let Some(format) = args.format {
            self.report.format = format;
        }
        if let Some(ref save) = args.save {
            self.report.save = Some(save.display().to_string());
        }
    }

    /// Check the settings that would make a load meaningless.
    pub fn validate(&self) -> Result<()> {
        let input = &self.input;

        if input.algorithms.is_empty() {
            bail!("At least one algorithm is required");
        }

        let mut seen = HashSet::new();
        for algorithm in &input.algorithms {
            if algorithm.trim().is_empty() {
                bail!("Algorithm labels must not be empty");
            }
            if !seen.insert(algorithm.as_str()) {
                bail!("Duplicate algorithm label: {}", algorithm);
            }
        }

        if input.min_threads == 0 {
            bail!("min_threads must be at least 1");
        }
        if input.min_threads > input.max_threads {
            bail!(
                "min_threads ({}) must not exceed max_threads ({})",
                input.min_threads,
                input.max_threads
            );
        }

        if input.max_threads > MAX_THREADS {
            bail!(
                "max_threads ({}) must not exceed {}",
                input.max_threads,
                MAX_THREADS
            );
        }

        if self.chart.width == 0 || self.chart.height == 0 {
            bail!("Chart width and height must be non-zero");
        }

        Ok(())
    }

    /// The input layout these settings describe.
    pub fn input_layout(&self) -> InputLayout {
        InputLayout {
            dir: PathBuf::from(&self.input.dir),
            prefix: self.input.prefix.clone(),
            operation: self.input.operation.clone(),
            algorithms: self.input.algorithms.clone(),
            thread_counts: (self.input.min_threads..=self.input.max_threads).collect(),
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::tests::make_args;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.input.dir, "out");
        assert_eq!(config.input.algorithms.len(), 9);
        assert_eq!(config.input.algorithms[0], "v2a");
        assert_eq!(config.input.algorithms[8], "v4d");
        assert_eq!(config.chart.title, "ID Throughput");
        assert!(config.chart.show);
        assert_eq!(config.report.format, OutputFormat::Text);
    }

    #[test]
    fn test_default_layout() {
        let layout = Config::default().input_layout();
        assert_eq!(layout.thread_counts, (1..=16).collect::<Vec<u32>>());
        assert_eq!(layout.file_count(), 144);
        assert_eq!(
            layout.result_path("v3d", 12),
            PathBuf::from("out/lockfree::v3d::get-t12.txt")
        );
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[input]
dir = "results"
algorithms = ["v3a", "v4b"]
max_threads = 8

[chart]
output = "scaling.svg"
show = false
viewer = "feh"

[report]
format = "markdown"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.input.dir, "results");
        assert_eq!(config.input.prefix, "lockfree");
        assert_eq!(config.input.algorithms, vec!["v3a", "v4b"]);
        assert_eq!(config.input.min_threads, 1);
        assert_eq!(config.input.max_threads, 8);
        assert_eq!(config.chart.output, "scaling.svg");
        assert!(!config.chart.show);
        assert_eq!(config.chart.viewer.as_deref(), Some("feh"));
        assert_eq!(config.report.format, OutputFormat::Markdown);
    }

    #[test]
    fn test_empty_config_is_default() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.input.algorithms, default_algorithms());
        assert_eq!(config.chart.width, 1024);
    }

    #[test]
    fn test_merge_with_args() {
        let mut args = make_args();
        args.dir = Some(PathBuf::from("bench-out"));
        args.algorithms = Some(vec!["v2a".to_string()]);
        args.max_threads = Some(4);
        args.no_show = true;
        args.format = Some(OutputFormat::Json);

        let mut config = Config::default();
        config.input.prefix = "custom".to_string();
        config.merge_with_args(&args);

        assert_eq!(config.input.dir, "bench-out");
        assert_eq!(config.input.prefix, "custom");
        assert_eq!(config.input.algorithms, vec!["v2a"]);
        assert_eq!(config.input.max_threads, 4);
        assert!(!config.chart.show);
        assert_eq!(config.report.format, OutputFormat::Json);
        assert!(config.report.save.is_none());
    }

    #[test]
    fn test_validate() {
        assert!(Config::default().validate().is_ok());

        let mut config = Config::default();
        config.input.algorithms.push("v2a".to_string());
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.input.algorithms.clear();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.input.min_threads = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.input.min_threads = 9;
        config.input.max_threads = 8;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bounds_thread_range() {
        let mut config = Config::default();
        config.input.max_threads = MAX_THREADS;
        assert!(config.validate().is_ok());

        config.input.min_threads = u32::MAX;
        config.input.max_threads = u32::MAX;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_threads"));
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[input]"));
        assert!(toml_str.contains("[chart]"));
        assert!(toml_str.contains("[report]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.input.algorithms, default_algorithms());
    }
}
