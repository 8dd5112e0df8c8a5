//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::models::MissingChartPolicy;
use clap::Parser;
use std::path::PathBuf;

/// cvechart - chart the CVE data of a markdown security report
///
/// Extracts per-service CVE counts and bolded CVSS scores from a report,
/// renders a pie chart and a bar chart, and writes a copy of the report
/// with the charts inserted before its "## CVEs" section.
///
/// Examples:
///   cvechart scan.md
///   cvechart scan.md --output-dir charts
///   cvechart scan.md --missing-chart omit --suffix _charts
///   cvechart scan.md --dry-run --format json
///   cvechart --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Markdown report to process
    #[arg(value_name = "REPORT", required_unless_present = "init_config")]
    pub report: Option<PathBuf>,

    /// Directory the chart images are written to
    #[arg(
        short = 'd',
        long,
        default_value = ".",
        value_name = "DIR",
        env = "CVECHART_OUTPUT_DIR"
    )]
    pub output_dir: PathBuf,

    /// Path to configuration file
    ///
    /// If not specified, looks for .cvechart.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Suffix appended to the report name for the modified copy
    ///
    /// Default: from config or "_modified".
    #[arg(long, value_name = "SUFFIX")]
    pub suffix: Option<String>,

    /// What to insert for a chart that has no data
    #[arg(long, value_name = "POLICY")]
    pub missing_chart: Option<MissingChartPolicy>,

    /// Also write debug-level logs to this file
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Extract and print the CVE summary without writing any file
    #[arg(long)]
    pub dry_run: bool,

    /// Summary format for --dry-run (text, json)
    #[arg(long, default_value = "text", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Generate a default .cvechart.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the dry-run summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain text (default)
    #[default]
    Text,
    /// JSON format
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

        match self.report {
            Some(ref report) => {
                if !report.exists() {
                    return Err(format!("Report does not exist: {}", report.display()));
                }
                if !report.is_file() {
                    return Err(format!("Report is not a file: {}", report.display()));
                }
            }
            None => return Err("A report path is required".to_string()),
        }

        if self.output_dir.exists() && !self.output_dir.is_dir() {
            return Err(format!(
                "Output path is not a directory: {}",
                self.output_dir.display()
            ));
        }

        if let Some(ref suffix) = self.suffix {
            if suffix.is_empty() {
                return Err("Suffix must not be empty".to_string());
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
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

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_args(report: PathBuf) -> Args {
        Args {
            report: Some(report),
            output_dir: PathBuf::from("."),
            config: None,
            suffix: None,
            missing_chart: None,
            log_file: None,
            verbose: false,
            quiet: false,
            dry_run: false,
            format: OutputFormat::Text,
            init_config: false,
        }
    }

    #[test]
    fn test_parse_from_command_line() {
        let args = Args::try_parse_from([
            "cvechart",
            "scan.md",
            "-d",
            "charts",
            "--missing-chart",
            "omit",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(args.report, Some(PathBuf::from("scan.md")));
        assert_eq!(args.output_dir, PathBuf::from("charts"));
        assert_eq!(args.missing_chart, Some(MissingChartPolicy::Omit));
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn test_report_required_unless_init_config() {
        assert!(Args::try_parse_from(["cvechart"]).is_err());
        assert!(Args::try_parse_from(["cvechart", "--init-config"]).is_ok());
    }

    #[test]
    fn test_validation() {
        let dir = TempDir::new().unwrap();
        let report = dir.path().join("scan.md");
        std::fs::write(&report, "# Report\n").unwrap();

        let args = make_args(report.clone());
        assert!(args.validate().is_ok());

        let missing = make_args(dir.path().join("absent.md"));
        assert!(missing.validate().is_err());

        let directory = make_args(dir.path().to_path_buf());
        assert!(directory.validate().is_err());

        let mut empty_suffix = make_args(report.clone());
        empty_suffix.suffix = Some(String::new());
        assert!(empty_suffix.validate().is_err());

        let mut file_as_output = make_args(report.clone());
        file_as_output.output_dir = report;
        assert!(file_as_output.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let dir = TempDir::new().unwrap();
        let report = dir.path().join("scan.md");
        std::fs::write(&report, "# Report\n").unwrap();

        let mut args = make_args(report);
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args(PathBuf::from("scan.md"));
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
