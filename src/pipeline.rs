//! The extract → render → inject sequence for one report.

use crate::analysis::{aggregate_services, bucket_cvss_scores, total_cves};
use crate::chart::ChartRenderer;
use crate::config::Config;
use crate::error::ChartError;
use crate::extract::Extractor;
use crate::models::{ExtractionSummary, ReportDocument};
use crate::report::{insert_image_references, write_modified_report, InjectOptions};
use anyhow::{Context, Result};
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// What a run produced.
#[derive(Debug)]
pub struct PipelineOutcome {
    /// Pie chart path, if there were CVE counts to plot.
    pub pie_chart: Option<PathBuf>,
    /// Bar chart path, if there were CVSS scores to plot.
    pub bar_chart: Option<PathBuf>,
    /// Path of the modified report, or why it could not be produced.
    pub injection: std::result::Result<PathBuf, ChartError>,
}

/// Runs all stages over a single report.
pub struct Pipeline {
    config: Config,
    extractor: Extractor,
    renderer: ChartRenderer,
    base_dir: PathBuf,
}

impl Pipeline {
    /// Compile patterns and set up the renderer.
    ///
    /// Chart references in the modified report are written relative to
    /// `base_dir`.
    pub fn new(config: Config, base_dir: PathBuf) -> Result<Self> {
        let extractor = Extractor::new(&config.patterns, config.chart.min_cvss_score)
            .context("Failed to compile extraction patterns")?;
        let renderer = ChartRenderer::new(config.chart.clone());

        Ok(Self {
            config,
            extractor,
            renderer,
            base_dir,
        })
    }

    /// Extract and aggregate without writing anything.
    pub fn summarize(&self, document: &ReportDocument) -> ExtractionSummary {
        let records = self.extractor.extract_service_records(&document.content);
        let scores = self.extractor.extract_cvss_scores(&document.content);
        let services = aggregate_services(&records);

        ExtractionSummary {
            report: document.path.display().to_string(),
            generated_at: Utc::now(),
            total_cves: total_cves(&services),
            services,
            cvss_buckets: bucket_cvss_scores(&scores),
            scored_cves: scores.len(),
        }
    }

    /// Render both charts into `output_dir` and write the modified report.
    ///
    /// A missing section marker is reported in the outcome, not as an
    /// error; read, render and write failures are errors.
    pub fn run(&self, report: &Path, output_dir: &Path) -> Result<PipelineOutcome> {
        let document = ReportDocument::load(report)?;
        debug!(
            "Loaded {} ({} bytes)",
            document.path.display(),
            document.content.len()
        );

        let records = self.extractor.extract_service_records(&document.content);
        let scores = self.extractor.extract_cvss_scores(&document.content);

        let pie_chart = self
            .renderer
            .render_pie_chart(&records, output_dir)
            .map_err(|e| {
                error!("Pie chart generation failed: {}", e);
                e
            })?;
        let bar_chart = self
            .renderer
            .render_bar_chart(&scores, output_dir)
            .map_err(|e| {
                error!("Bar chart generation failed: {}", e);
                e
            })?;

        let options = InjectOptions::from_config(&self.config, self.base_dir.clone());

        let injection = match insert_image_references(
            &document.content,
            pie_chart.as_deref(),
            bar_chart.as_deref(),
            &options,
        ) {
            Ok(content) => Ok(write_modified_report(
                &document.path,
                &content,
                &self.config.report.suffix,
            )?),
            Err(e) => {
                info!("{} ({})", e, document.path.display());
                Err(e)
            }
        };

        Ok(PipelineOutcome {
            pie_chart,
            bar_chart,
            injection,
        })
    }
}
