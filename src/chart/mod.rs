//! Chart rendering.
//!
//! Both charts are static PNG files written with the `plotters` bitmap
//! backend. A chart with no data is not an error: the renderer logs it
//! and returns `None`, and no file is created.

mod bar;
mod pie;

use crate::analysis::{aggregate_services, bucket_cvss_scores};
use crate::config::ChartConfig;
use crate::error::ChartError;
use crate::models::ServiceCveRecord;
use std::path::{Path, PathBuf};
use tracing::info;

/// File name of the service distribution chart.
pub const PIE_CHART_FILE: &str = "pie_chart.png";

/// File name of the CVSS score chart.
pub const BAR_CHART_FILE: &str = "cve_count_by_cvss_chart.png";

/// Renders the two report charts into an output directory.
pub struct ChartRenderer {
    config: ChartConfig,
}

impl ChartRenderer {
    /// Create a new renderer.
    pub fn new(config: ChartConfig) -> Self {
        Self { config }
    }

    /// Render CVE counts per service as a pie chart.
    ///
    /// Returns the written path, or `None` when there is nothing to plot.
    pub fn render_pie_chart(
        &self,
        records: &[ServiceCveRecord],
        output_dir: &Path,
    ) -> Result<Option<PathBuf>, ChartError> {
        let entries = aggregate_services(records);
        if entries.is_empty() {
            info!("No CVEs found, the pie chart will not be created");
            return Ok(None);
        }

        let path = prepare_output(output_dir, PIE_CHART_FILE)?;
        pie::draw(&path, &entries, &self.config)?;

        info!("Pie chart saved as {}", path.display());
        Ok(Some(path))
    }

    /// Render CVE counts per rounded CVSS score as a bar chart.
    ///
    /// Returns the written path, or `None` when there is nothing to plot.
    pub fn render_bar_chart(
        &self,
        scores: &[u32],
        output_dir: &Path,
    ) -> Result<Option<PathBuf>, ChartError> {
        let buckets = bucket_cvss_scores(scores);
        if buckets.is_empty() {
            info!(
                "No CVSS scores above {} found, the bar chart will not be created",
                self.config.min_cvss_score
            );
            return Ok(None);
        }

        let path = prepare_output(output_dir, BAR_CHART_FILE)?;
        bar::draw(&path, &buckets, &self.config)?;

        info!("Bar chart saved as {}", path.display());
        Ok(Some(path))
    }
}

/// Make sure the output directory exists and return the chart path.
fn prepare_output(output_dir: &Path, file_name: &str) -> Result<PathBuf, ChartError> {
    std::fs::create_dir_all(output_dir).map_err(|source| ChartError::Write {
        path: output_dir.to_path_buf(),
        source,
    })?;

    Ok(output_dir.join(file_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn renderer() -> ChartRenderer {
        ChartRenderer::new(ChartConfig::default())
    }

    #[test]
    fn test_empty_records_produce_no_pie_chart() {
        let dir = TempDir::new().unwrap();

        let result = renderer().render_pie_chart(&[], dir.path()).unwrap();

        assert!(result.is_none());
        assert!(!dir.path().join(PIE_CHART_FILE).exists());
    }

    #[test]
    fn test_empty_scores_produce_no_bar_chart() {
        let dir = TempDir::new().unwrap();

        let result = renderer().render_bar_chart(&[], dir.path()).unwrap();

        assert!(result.is_none());
        assert!(!dir.path().join(BAR_CHART_FILE).exists());
    }

    #[test]
    fn test_render_pie_chart() {
        let dir = TempDir::new().unwrap();
        let records = vec![
            ServiceCveRecord::new(80, "Apache httpd", 3),
            ServiceCveRecord::new(22, "OpenSSH", 1),
        ];

        let path = renderer()
            .render_pie_chart(&records, dir.path())
            .unwrap()
            .unwrap();

        assert_eq!(path, dir.path().join(PIE_CHART_FILE));
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_render_bar_chart_into_new_directory() {
        let dir = TempDir::new().unwrap();
        let output_dir = dir.path().join("charts");

        let path = renderer()
            .render_bar_chart(&[6, 6, 9], &output_dir)
            .unwrap()
            .unwrap();

        assert_eq!(path, output_dir.join(BAR_CHART_FILE));
        assert!(path.exists());
    }

    #[test]
    fn test_render_bar_chart_single_score() {
        let dir = TempDir::new().unwrap();

        let path = renderer()
            .render_bar_chart(&[7, 7], dir.path())
            .unwrap()
            .unwrap();

        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
