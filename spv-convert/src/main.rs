//! spv-convert - Main entry point
//!
//! Converts the annotated and thread CSV tables into the static viewer's data
//! files. Thread content is encrypted with the password given on the command
//! line; the annotated records are written in the clear.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use spv_common::config::load_toml_config;
use spv_common::logging::init_logging;
use spv_convert::{run_conversion, validate_password, ConvertPaths, PathOverrides};
use tracing::{error, info};

/// Command-line arguments for spv-convert
#[derive(Parser, Debug)]
#[command(name = "spv-convert")]
#[command(about = "Convert annotated CSV data into the viewer's JSON and encrypted thread files")]
#[command(version)]
struct Args {
    /// Password used to encrypt thread content (at least 8 characters)
    #[arg(short, long)]
    password: String,

    /// Folder holding all_annotated.csv and all_threads_anonymized.csv
    #[arg(long)]
    input_dir: Option<PathBuf>,

    /// Annotated CSV file (overrides --input-dir)
    #[arg(long)]
    annotated: Option<PathBuf>,

    /// Threads CSV file (overrides --input-dir)
    #[arg(long)]
    threads: Option<PathBuf>,

    /// Folder receiving the generated files
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let loaded = load_toml_config(args.config.as_deref(), "spv-convert")
        .context("Failed to load configuration")?;
    init_logging(&loaded.config.logging.level)?;

    info!(
        "Starting spv-convert v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    info!("Started at {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
    loaded.log_source();

    validate_password(&args.password)?;

    let overrides = PathOverrides {
        input_dir: args.input_dir,
        annotated_csv: args.annotated,
        threads_csv: args.threads,
        output_dir: args.output_dir,
    };
    let paths = ConvertPaths::resolve(&overrides, &loaded.config);

    let summary = match run_conversion(&paths, &args.password) {
        Ok(summary) => summary,
        Err(e) => {
            error!("Conversion failed: {}", e);
            return Err(e.into());
        }
    };

    info!("Conversion complete!");
    info!("  - Annotated records: {}", summary.annotated_records);
    info!(
        "  - Thread groups: {} ({} posts)",
        summary.thread_groups, summary.total_posts
    );
    if !summary.parse_errors.is_empty() {
        info!("  - Rows with vaccine_types fallback: {}", summary.parse_errors.len());
    }
    if !summary.validation.warnings.is_empty() {
        info!("  - Validation warnings: {}", summary.validation.warnings.len());
    }
    info!("Output folder: {}", paths.output_dir.display());
    info!("The password is not stored anywhere. Share it with viewers separately.");

    Ok(())
}
