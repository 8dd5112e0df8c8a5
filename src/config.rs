//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.cvechart.toml` files.

use crate::models::MissingChartPolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = ".cvechart.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Extraction patterns.
    #[serde(default)]
    pub patterns: PatternConfig,

    /// Chart settings.
    #[serde(default)]
    pub chart: ChartConfig,

    /// Modified report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,

    /// Optional debug log file.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

/// Regular expressions used to pull data out of a report.
///
/// Report formats drift; these are the only place the expected
/// layout is written down.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternConfig {
    /// Captures port, service and CVE count, in that order.
    #[serde(default = "default_service_pattern")]
    pub service_record: String,

    /// Captures a single decimal CVSS score.
    #[serde(default = "default_cvss_pattern")]
    pub cvss_score: String,

    /// Heading the chart sections are inserted before.
    #[serde(default = "default_section_marker")]
    pub section_marker: String,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            service_record: default_service_pattern(),
            cvss_score: default_cvss_pattern(),
            section_marker: default_section_marker(),
        }
    }
}

fn default_service_pattern() -> String {
    r"(\d+): (.*?)(?: version=[\w.]+)? \(CVE Count: (\d+)\)".to_string()
}

fn default_cvss_pattern() -> String {
    r"\*\*(\d+\.\d+)\*\*".to_string()
}

fn default_section_marker() -> String {
    "## CVEs".to_string()
}

/// Chart rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "default_pie_width")]
    pub pie_width: u32,

    #[serde(default = "default_pie_height")]
    pub pie_height: u32,

    #[serde(default = "default_bar_width")]
    pub bar_width: u32,

    #[serde(default = "default_bar_height")]
    pub bar_height: u32,

    #[serde(default = "default_pie_title")]
    pub pie_title: String,

    #[serde(default = "default_bar_title")]
    pub bar_title: String,

    /// Angle in degrees of the first pie slice.
    #[serde(default = "default_pie_start_angle")]
    pub pie_start_angle: f64,

    /// Scores must round to strictly more than this to be charted.
    #[serde(default = "default_min_cvss_score")]
    pub min_cvss_score: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            pie_width: default_pie_width(),
            pie_height: default_pie_height(),
            bar_width: default_bar_width(),
            bar_height: default_bar_height(),
            pie_title: default_pie_title(),
            bar_title: default_bar_title(),
            pie_start_angle: default_pie_start_angle(),
            min_cvss_score: default_min_cvss_score(),
        }
    }
}

fn default_pie_width() -> u32 {
    1000
}

fn default_pie_height() -> u32 {
    700
}

fn default_bar_width() -> u32 {
    1200
}

fn default_bar_height() -> u32 {
    600
}

fn default_pie_title() -> String {
    "Distribution of CVE Counts by Service".to_string()
}

fn default_bar_title() -> String {
    "CVE Count by CVSS Score".to_string()
}

fn default_pie_start_angle() -> f64 {
    140.0
}

fn default_min_cvss_score() -> u32 {
    5
}

/// Modified report settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Appended to the report file stem for the output file.
    #[serde(default = "default_suffix")]
    pub suffix: String,

    #[serde(default = "default_pie_heading")]
    pub pie_heading: String,

    #[serde(default = "default_bar_heading")]
    pub bar_heading: String,

    /// What to insert for a chart that was not produced.
    #[serde(default)]
    pub missing_chart: MissingChartPolicy,

    #[serde(default = "default_placeholder_text")]
    pub placeholder_text: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            suffix: default_suffix(),
            pie_heading: default_pie_heading(),
            bar_heading: default_bar_heading(),
            missing_chart: MissingChartPolicy::default(),
            placeholder_text: default_placeholder_text(),
        }
    }
}

fn default_suffix() -> String {
    "_modified".to_string()
}

fn default_pie_heading() -> String {
    "## CVE Distribution by Service".to_string()
}

fn default_bar_heading() -> String {
    "## CVE Distribution by CVSS Score".to_string()
}

fn default_placeholder_text() -> String {
    "_No data available for this chart._".to_string()
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
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref suffix) = args.suffix {
            self.report.suffix = suffix.clone();
        }
        if let Some(policy) = args.missing_chart {
            self.report.missing_chart = policy;
        }
        if let Some(ref log_file) = args.log_file {
            self.general.log_file = Some(log_file.clone());
        }

        if args.verbose {
            self.general.verbose = true;
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

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.patterns.section_marker, "## CVEs");
        assert_eq!(config.chart.min_cvss_score, 5);
        assert_eq!(config.report.suffix, "_modified");
        assert_eq!(config.report.missing_chart, MissingChartPolicy::Placeholder);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r###"
[general]
verbose = true
log_file = "logs/cvechart.log"

[patterns]
section_marker = "## Vulnerabilities"

[chart]
min_cvss_score = 6
pie_title = "Services"

[report]
suffix = "_charts"
missing_chart = "omit"
"###;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert!(config.general.verbose);
        assert_eq!(
            config.general.log_file,
            Some(PathBuf::from("logs/cvechart.log"))
        );
        assert_eq!(config.patterns.section_marker, "## Vulnerabilities");
        assert_eq!(config.patterns.cvss_score, default_cvss_pattern());
        assert_eq!(config.chart.min_cvss_score, 6);
        assert_eq!(config.chart.pie_title, "Services");
        assert_eq!(config.chart.bar_width, 1200);
        assert_eq!(config.report.suffix, "_charts");
        assert_eq!(config.report.missing_chart, MissingChartPolicy::Omit);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[patterns]"));
        assert!(toml_str.contains("[chart]"));
        assert!(toml_str.contains("[report]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.patterns.service_record, default_service_pattern());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[report]\nsuffix = \"_x\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.report.suffix, "_x");

        std::fs::write(&path, "[report\n").unwrap();
        assert!(Config::load(&path).is_err());
    }
}
