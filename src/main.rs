//! cvechart - CVE charts for markdown security reports
//!
//! A CLI tool that extracts per-service CVE counts and CVSS scores from a
//! markdown report, renders them as PNG charts, and writes a copy of the
//! report with the charts inserted before its CVE section.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (unreadable report, bad config, render failure, etc.)
//!   2 - CVE section heading not found (charts written, no modified report)

mod analysis;
mod chart;
mod cli;
mod config;
mod error;
mod extract;
mod logging;
mod models;
mod pipeline;
mod report;

use anyhow::{Context, Result};
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE_NAME};
use logging::LogSettings;
use models::ReportDocument;
use pipeline::Pipeline;
use std::path::Path;
use tracing::{debug, error, info};

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

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    // The guard keeps diagnostics alive for the rest of the run.
    let log_settings = LogSettings {
        console_level: if config.general.verbose && !args.quiet {
            tracing::Level::DEBUG
        } else {
            args.log_level()
        },
        log_file: config.general.log_file.clone(),
    };
    let _log_guard = logging::init(&log_settings)?;

    info!("cvechart v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(&args, config) {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            error!("Chart generation failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .cvechart.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!("⚠️  {} already exists. Remove it first or edit it manually.", CONFIG_FILE_NAME);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to customize patterns, chart sizes, and headings.");
    Ok(())
}

/// Run the charting workflow. Returns exit code (0 or 2).
fn run(args: &Args, config: Config) -> Result<i32> {
    let report = args
        .report
        .as_deref()
        .context("A report path is required")?;

    let base_dir = std::env::current_dir().context("Failed to resolve current directory")?;
    let pipeline = Pipeline::new(config, base_dir)?;

    if args.dry_run {
        return handle_dry_run(&pipeline, report, args.format);
    }

    if !args.quiet {
        println!("📊 Charting CVEs from: {}", report.display());
    }

    let outcome = pipeline.run(report, &args.output_dir)?;

    if !args.quiet {
        match outcome.pie_chart {
            Some(ref path) => println!("   Pie chart: {}", path.display()),
            None => println!("   Pie chart: skipped (no CVE counts)"),
        }
        match outcome.bar_chart {
            Some(ref path) => println!("   Bar chart: {}", path.display()),
            None => println!("   Bar chart: skipped (no CVSS scores)"),
        }
    }

    match outcome.injection {
        Ok(path) => {
            if !args.quiet {
                println!("\n✅ Modified report saved to: {}", path.display());
            }
            Ok(0)
        }
        Err(e) if e.is_marker_not_found() => {
            error!("{}", e);
            eprintln!("\n⛔ {}. No modified report was written (exit code 2).", e);
            Ok(2)
        }
        Err(e) => Err(e.into()),
    }
}

/// Handle --dry-run: extract, print the summary, write nothing.
fn handle_dry_run(pipeline: &Pipeline, report: &Path, format: OutputFormat) -> Result<i32> {
    let document = ReportDocument::load(report)?;
    let summary = pipeline.summarize(&document);

    match format {
        OutputFormat::Text => println!("{}", summary.to_text()),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?
        ),
    }

    Ok(0)
}

/// Load configuration from file or use defaults, then apply CLI overrides.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    let mut config = if let Some(ref config_path) = args.config {
        Config::load(config_path)?
    } else {
        // Try default location
        match Config::load_default() {
            Ok(Some(config)) => config,
            Ok(None) => Config::default(),
            Err(e) => {
                eprintln!("⚠️  Ignoring {}: {:#}", CONFIG_FILE_NAME, e);
                Config::default()
            }
        }
    };

    config.merge_with_args(args);
    Ok(config)
}
