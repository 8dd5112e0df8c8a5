//! Pie chart of CVE counts per service.

use crate::config::ChartConfig;
use crate::error::ChartError;
use crate::models::AggregatedServiceEntry;
use plotters::element::Pie;
use plotters::prelude::*;
use std::path::Path;

/// Slice colors, cycled when there are more services than colors.
const SLICE_COLORS: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

pub(super) fn draw(
    path: &Path,
    entries: &[AggregatedServiceEntry],
    config: &ChartConfig,
) -> Result<(), ChartError> {
    let root = BitMapBackend::new(path, (config.pie_width, config.pie_height)).into_drawing_area();
    root.fill(&WHITE).map_err(ChartError::render)?;

    let area = root
        .titled(&config.pie_title, ("sans-serif", 28))
        .map_err(ChartError::render)?;

    let (width, height) = area.dim_in_pixel();
    let center = (width as i32 / 2, height as i32 / 2);
    let radius = f64::from(width.min(height)) * 0.35;

    let sizes: Vec<f64> = entries.iter().map(|e| e.total_cve_count as f64).collect();
    let labels: Vec<&str> = entries.iter().map(|e| e.label.as_str()).collect();
    let colors: Vec<RGBColor> = (0..entries.len())
        .map(|i| SLICE_COLORS[i % SLICE_COLORS.len()])
        .collect();

    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.start_angle(config.pie_start_angle);
    pie.label_style(("sans-serif", 16).into_font().color(&BLACK));
    pie.percentages(("sans-serif", 14).into_font().color(&BLACK));

    area.draw(&pie).map_err(ChartError::render)?;
    root.present().map_err(ChartError::render)?;

    Ok(())
}
