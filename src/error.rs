//! Error types shared by the extraction, rendering and injection stages.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning a report into charts.
#[derive(Debug, Error)]
pub enum ChartError {
    /// The report (or another input) could not be read as UTF-8 text.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An output file or directory could not be written.
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The plotting backend failed while drawing a chart.
    #[error("chart rendering failed: {0}")]
    Render(String),

    /// A configured extraction pattern is invalid.
    #[error("invalid extraction pattern: {0}")]
    Pattern(String),

    /// The insertion heading does not appear in the report.
    #[error("section '{marker}' not found in the markdown content")]
    MarkerNotFound { marker: String },
}

impl ChartError {
    /// Wrap any plotting backend error.
    pub fn render<E: std::fmt::Display>(err: E) -> Self {
        ChartError::Render(err.to_string())
    }

    /// Returns true if this is the recoverable "marker not found" case.
    pub fn is_marker_not_found(&self) -> bool {
        matches!(self, ChartError::MarkerNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_not_found_message() {
        let err = ChartError::MarkerNotFound {
            marker: "## CVEs".to_string(),
        };
        assert!(err.is_marker_not_found());
        assert_eq!(
            err.to_string(),
            "section '## CVEs' not found in the markdown content"
        );
    }

    #[test]
    fn test_read_error_includes_path() {
        let err = ChartError::Read {
            path: PathBuf::from("report.md"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(!err.is_marker_not_found());
        assert!(err.to_string().contains("report.md"));
    }
}
