//! Data models for the chart maker.
//!
//! This module contains the records extracted from a report, the
//! aggregated values fed to the charts, and the report document itself.

use crate::error::ChartError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Number of words kept from a service description.
pub const SERVICE_NAME_WORDS: usize = 3;

/// One `<port>: <service> (CVE Count: <n>)` line found in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceCveRecord {
    /// Port number the service listens on.
    pub port: u16,
    /// Service name, truncated to its first three words.
    pub service: String,
    /// Number of CVEs reported for this service (always > 0).
    pub cve_count: u64,
}

impl ServiceCveRecord {
    /// Build a record, truncating the service name.
    pub fn new(port: u16, service: &str, cve_count: u64) -> Self {
        Self {
            port,
            service: truncate_words(service, SERVICE_NAME_WORDS),
            cve_count,
        }
    }

    /// Pie chart grouping key, `"<port> | <service>"`.
    pub fn label(&self) -> String {
        format!("{} | {}", self.port, self.service)
    }
}

/// Keep the first `n` whitespace-separated words of `text`.
pub fn truncate_words(text: &str, n: usize) -> String {
    text.split_whitespace().take(n).collect::<Vec<_>>().join(" ")
}

/// CVE total for one `"port | service"` label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedServiceEntry {
    pub label: String,
    pub total_cve_count: u64,
}

/// Number of CVEs sharing a rounded CVSS score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CvssBucket {
    pub score: u32,
    pub count: usize,
}

/// A markdown report loaded into memory.
#[derive(Debug, Clone)]
pub struct ReportDocument {
    pub path: PathBuf,
    pub content: String,
}

impl ReportDocument {
    /// Read the whole report as UTF-8.
    pub fn load(path: &Path) -> Result<Self, ChartError> {
        let content = std::fs::read_to_string(path).map_err(|source| ChartError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            content,
        })
    }
}

/// What to insert when a chart could not be produced.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum MissingChartPolicy {
    /// Keep the subsection heading with an explicit "no data" line.
    #[default]
    Placeholder,
    /// Drop the subsection entirely.
    Omit,
}

impl fmt::Display for MissingChartPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingChartPolicy::Placeholder => write!(f, "placeholder"),
            MissingChartPolicy::Omit => write!(f, "omit"),
        }
    }
}

/// Snapshot of everything extracted from one report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionSummary {
    pub report: String,
    pub generated_at: DateTime<Utc>,
    pub services: Vec<AggregatedServiceEntry>,
    pub total_cves: u64,
    pub cvss_buckets: Vec<CvssBucket>,
    pub scored_cves: usize,
}

impl ExtractionSummary {
    /// Human-readable rendering used by `--dry-run --format text`.
    pub fn to_text(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Report: {}", self.report));
        lines.push(format!("Total CVEs by service: {}", self.total_cves));
        for entry in &self.services {
            lines.push(format!("  - {}: {}", entry.label, entry.total_cve_count));
        }

        lines.push(format!("CVEs with a CVSS score: {}", self.scored_cves));
        for bucket in &self.cvss_buckets {
            lines.push(format!("  - score {}: {}", bucket.score, bucket.count));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_name_truncated_to_three_words() {
        let record = ServiceCveRecord::new(22, "OpenSSH 8.2p1 Ubuntu 4ubuntu0.5", 4);
        assert_eq!(record.service, "OpenSSH 8.2p1 Ubuntu");
        assert_eq!(record.label(), "22 | OpenSSH 8.2p1 Ubuntu");
    }

    #[test]
    fn test_truncate_words_collapses_whitespace() {
        assert_eq!(truncate_words("  Apache   httpd ", 3), "Apache httpd");
        assert_eq!(truncate_words("", 3), "");
    }

    #[test]
    fn test_load_missing_report() {
        let err = ReportDocument::load(Path::new("/nonexistent/report.md")).unwrap_err();
        assert!(matches!(err, ChartError::Read { .. }));
    }

    #[test]
    fn test_summary_text() {
        let summary = ExtractionSummary {
            report: "scan.md".to_string(),
            generated_at: Utc::now(),
            services: vec![AggregatedServiceEntry {
                label: "80 | Apache httpd".to_string(),
                total_cve_count: 8,
            }],
            total_cves: 8,
            cvss_buckets: vec![CvssBucket { score: 6, count: 2 }],
            scored_cves: 2,
        };

        let text = summary.to_text();
        assert!(text.contains("80 | Apache httpd: 8"));
        assert!(text.contains("score 6: 2"));
    }

    #[test]
    fn test_policy_serde() {
        let policy: MissingChartPolicy = serde_json::from_str("\"omit\"").unwrap();
        assert_eq!(policy, MissingChartPolicy::Omit);
        assert_eq!(MissingChartPolicy::default().to_string(), "placeholder");
    }
}
