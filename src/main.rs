//! idrate - lock-free ID generator throughput charts
//!
//! A CLI tool that gathers the per-thread-count result files written by the
//! snowflake benchmark harness into one throughput table, prints it and
//! charts how each algorithm scales with the number of threads.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (missing or malformed result file, config, chart, etc.)
//!   2 - `--check` found missing result files

mod chart;
mod cli;
mod config;
mod error;
mod loader;
mod models;
mod report;

use anyhow::{Context, Result};
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE};
use models::{InputLayout, TableMetadata};
use std::path::Path;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("idrate v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(args) {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Run failed: {:#}", e);
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .idrate.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!("{} already exists. Remove it first or edit it manually.", CONFIG_FILE);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("Created {} with default settings.", CONFIG_FILE);
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr; stdout carries only the table.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Load, report, chart. Returns the exit code.
fn run(args: Args) -> Result<i32> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);
    config.validate().context("Invalid configuration")?;

    let layout = config.input_layout();

    if args.check {
        return handle_check(&layout);
    }

    let load_options = loader::LoadOptions {
        show_progress: !args.quiet,
    };
    aggregate(&config, &load_options)?;

    Ok(0)
}

/// Load -> Report -> Save -> Visualize -> Display.
///
/// Nothing is printed or charted unless every result file loads.
fn aggregate(config: &Config, load_options: &loader::LoadOptions) -> Result<()> {
    let layout = config.input_layout();

    // Load
    let table = loader::load_table(&layout, load_options)?;

    // Report
    let output = match config.report.format {
        OutputFormat::Text => report::generate_text_report(&table),
        OutputFormat::Markdown => report::generate_markdown_report(&table),
        OutputFormat::Json => {
            let metadata = TableMetadata::new(&layout.dir, layout.file_count());
            report::generate_json_report(&table, &metadata)?
        }
    };
    print!("{}", output);
    if !output.ends_with('\n') {
        println!();
    }

    if let Some(ref save) = config.report.save {
        let save_path = Path::new(save);
        report::save_table(&table, save_path)?;
        info!("Saved table to {}", save_path.display());
    }

    // Visualize
    let chart_options = chart::ChartOptions::from(&config.chart);
    chart::render_chart(&table, &chart_options)
        .with_context(|| format!("Failed to render {}", chart_options.output.display()))?;

    if config.chart.show {
        if let Err(e) = chart::show(&chart_options.output, config.chart.viewer.as_deref()) {
            warn!("Could not display chart: {:#}", e);
        }
    } else {
        info!("Chart written to {}", chart_options.output.display());
    }

    Ok(())
}

/// Handle --check: list missing result files without parsing anything.
fn handle_check(layout: &InputLayout) -> Result<i32> {
    let check = loader::check_inputs(layout);

    println!(
        "{}/{} result files present in {}",
        check.present.len(),
        layout.file_count(),
        layout.dir.display()
    );

    if check.is_complete() {
        return Ok(0);
    }

    println!("Missing:");
    for path in &check.missing {
        println!("  {}", path.display());
    }
    Ok(2)
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {:#}", e);
            Ok(Config::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_config(dir: &Path) -> Config {
        let mut config = Config::default();
        config.input.dir = dir.join("out").display().to_string();
        config.input.algorithms = vec!["v2a".to_string(), "v4d".to_string()];
        config.input.max_threads = 4;
        config.chart.output = dir.join("chart.svg").display().to_string();
        config.chart.show = false;
        config.report.save = Some(dir.join("table.txt").display().to_string());
        config
    }

    fn write_results(config: &Config) {
        let layout = config.input_layout();
        std::fs::create_dir_all(&layout.dir).unwrap();
        for path in layout.expected_paths() {
            std::fs::write(path, "5.0\n").unwrap();
        }
    }

    #[test]
    fn test_aggregate_writes_table_and_chart() {
        let temp_dir = TempDir::new().unwrap();
        let config = create_test_config(temp_dir.path());
        write_results(&config);

        aggregate(&config, &loader::LoadOptions::default()).unwrap();

        assert!(temp_dir.path().join("chart.svg").exists());
        let saved = std::fs::read_to_string(temp_dir.path().join("table.txt")).unwrap();
        assert_eq!(saved, "5 5 5 5\n5 5 5 5\n");
    }

    #[test]
    fn test_aggregate_missing_file_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let config = create_test_config(temp_dir.path());
        write_results(&config);
        std::fs::remove_file(config.input_layout().result_path("v4d", 3)).unwrap();

        let err = aggregate(&config, &loader::LoadOptions::default()).unwrap_err();

        assert!(err.to_string().contains("v4d::get-t3.txt"));
        assert!(!temp_dir.path().join("chart.svg").exists());
        assert!(!temp_dir.path().join("table.txt").exists());
    }

    #[test]
    fn test_aggregate_malformed_file_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let config = create_test_config(temp_dir.path());
        write_results(&config);
        std::fs::write(config.input_layout().result_path("v2a", 1), "n/a\n").unwrap();

        assert!(aggregate(&config, &loader::LoadOptions::default()).is_err());
        assert!(!temp_dir.path().join("chart.svg").exists());
    }
}
