//! Bar chart of CVE counts per CVSS score.

use crate::config::ChartConfig;
use crate::error::ChartError;
use crate::models::CvssBucket;
use plotters::prelude::*;
use std::path::Path;

const BAR_COLOR: RGBColor = RGBColor(135, 206, 235);

pub(super) fn draw(path: &Path, buckets: &[CvssBucket], config: &ChartConfig) -> Result<(), ChartError> {
    let root = BitMapBackend::new(path, (config.bar_width, config.bar_height)).into_drawing_area();
    root.fill(&WHITE).map_err(ChartError::render)?;

    let counts: Vec<u32> = buckets
        .iter()
        .map(|b| u32::try_from(b.count).unwrap_or(u32::MAX))
        .collect();
    let max_count = counts.iter().copied().max().unwrap_or(0);
    // Integer ranges are inclusive, so the last index closes the axis.
    let last = (buckets.len() as u32).saturating_sub(1);

    // Bars are indexed by position; the axis labels carry the score text.
    let mut chart = ChartBuilder::on(&root)
        .caption(&config.bar_title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(45)
        .y_label_area_size(55)
        .build_cartesian_2d((0u32..last).into_segmented(), 0u32..max_count.saturating_add(1))
        .map_err(ChartError::render)?;

    let score_label = |value: &SegmentValue<u32>| match value {
        SegmentValue::CenterOf(i) => buckets
            .get(*i as usize)
            .map(|b| b.score.to_string())
            .unwrap_or_default(),
        _ => String::new(),
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(buckets.len())
        .x_label_formatter(&score_label)
        .x_desc("CVSS Score")
        .y_desc("CVE Count")
        .axis_desc_style(("sans-serif", 18))
        .draw()
        .map_err(ChartError::render)?;

    chart
        .draw_series(
            Histogram::vertical(&chart)
                .style(BAR_COLOR.filled())
                .margin(10)
                .data(counts.iter().enumerate().map(|(i, c)| (i as u32, *c))),
        )
        .map_err(ChartError::render)?;

    root.present().map_err(ChartError::render)?;

    Ok(())
}
