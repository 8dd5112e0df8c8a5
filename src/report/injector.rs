//! Chart reference injection.
//!
//! This module splices image references to the rendered charts into the
//! original markdown, right before the CVE section heading, and writes
//! the result next to the input report.

use crate::config::Config;
use crate::error::ChartError;
use crate::models::MissingChartPolicy;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// How the chart block is built and where it goes.
#[derive(Debug, Clone)]
pub struct InjectOptions {
    /// Heading the block is inserted before.
    pub marker: String,
    pub pie_heading: String,
    pub bar_heading: String,
    pub missing_chart: MissingChartPolicy,
    pub placeholder_text: String,
    /// Directory chart paths are made relative to.
    pub base_dir: PathBuf,
}

impl InjectOptions {
    /// Build options from configuration, relative to `base_dir`.
    pub fn from_config(config: &Config, base_dir: PathBuf) -> Self {
        Self {
            marker: config.patterns.section_marker.clone(),
            pie_heading: config.report.pie_heading.clone(),
            bar_heading: config.report.bar_heading.clone(),
            missing_chart: config.report.missing_chart,
            placeholder_text: config.report.placeholder_text.clone(),
            base_dir,
        }
    }
}

/// Insert the chart block before the first occurrence of the marker.
///
/// Returns `ChartError::MarkerNotFound` if the marker is absent; the
/// original text is never altered outside the insertion point.
pub fn insert_image_references(
    original: &str,
    pie_chart: Option<&Path>,
    bar_chart: Option<&Path>,
    options: &InjectOptions,
) -> Result<String, ChartError> {
    let Some(index) = original.find(&options.marker) else {
        return Err(ChartError::MarkerNotFound {
            marker: options.marker.clone(),
        });
    };

    let mut section = String::new();
    push_chart_section(&mut section, &options.pie_heading, "pie_chart", pie_chart, options);
    push_chart_section(&mut section, &options.bar_heading, "bar_chart", bar_chart, options);

    if section.is_empty() {
        debug!("No chart sections to insert");
        return Ok(original.to_string());
    }
    section.push('\n');

    let mut modified = String::with_capacity(original.len() + section.len());
    modified.push_str(&original[..index]);
    modified.push_str(&section);
    modified.push_str(&original[index..]);

    Ok(modified)
}

/// Append one `## heading` + image subsection.
fn push_chart_section(
    section: &mut String,
    heading: &str,
    alt: &str,
    chart: Option<&Path>,
    options: &InjectOptions,
) {
    match (chart, options.missing_chart) {
        (Some(path), _) => {
            let reference = relative_reference(path, &options.base_dir);
            section.push_str(&format!("\n{}\n![{}]({})\n", heading, alt, reference));
        }
        (None, MissingChartPolicy::Placeholder) => {
            section.push_str(&format!("\n{}\n{}\n", heading, options.placeholder_text));
        }
        (None, MissingChartPolicy::Omit) => {}
    }
}

/// Render a chart path as a markdown link target relative to `base`.
///
/// Paths outside `base` stay absolute.
pub fn relative_reference(path: &Path, base: &Path) -> String {
    let relative = if path.is_absolute() {
        match path.strip_prefix(base) {
            Ok(rel) => rel,
            Err(_) => return to_markdown_path(path),
        }
    } else {
        path
    };

    let text = to_markdown_path(relative);
    if text.starts_with("./") || text.starts_with("../") {
        text
    } else {
        format!("./{}", text)
    }
}

fn to_markdown_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Sibling path with `suffix` appended to the file stem.
///
/// `reports/scan.md` with `_modified` becomes `reports/scan_modified.md`.
pub fn modified_output_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let file_name = match input.extension() {
        Some(ext) => format!("{}{}.{}", stem, suffix, ext.to_string_lossy()),
        None => format!("{}{}", stem, suffix),
    };

    input.with_file_name(file_name)
}

/// Write the modified report next to `input`, never over it.
pub fn write_modified_report(
    input: &Path,
    content: &str,
    suffix: &str,
) -> Result<PathBuf, ChartError> {
    let output = modified_output_path(input, suffix);
    if output == input {
        return Err(ChartError::Write {
            path: output,
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "output would overwrite the input report",
            ),
        });
    }

    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let write_err = |source: std::io::Error| ChartError::Write {
        path: output.clone(),
        source,
    };

    let mut file = NamedTempFile::new_in(dir).map_err(write_err)?;
    file.write_all(content.as_bytes()).map_err(write_err)?;
    file.persist(&output).map_err(|e| write_err(e.error))?;

    info!("Modified report saved as {}", output.display());
    Ok(output)
}
