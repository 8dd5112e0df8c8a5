//! CVE aggregation and statistics.
//!
//! This module groups extracted records into the values the charts
//! plot and computes summary totals.

use crate::models::{AggregatedServiceEntry, CvssBucket, ServiceCveRecord};
use std::collections::BTreeMap;

/// Sum CVE counts per `"port | service"` label.
///
/// Entries come back sorted by label. Totals saturate at `u64::MAX`.
pub fn aggregate_services(records: &[ServiceCveRecord]) -> Vec<AggregatedServiceEntry> {
    let mut grouped: BTreeMap<String, u64> = BTreeMap::new();

    for record in records {
        let total = grouped.entry(record.label()).or_default();
        *total = total.saturating_add(record.cve_count);
    }

    grouped
        .into_iter()
        .map(|(label, total_cve_count)| AggregatedServiceEntry {
            label,
            total_cve_count,
        })
        .collect()
}

/// Count occurrences of each rounded score, lowest score first.
pub fn bucket_cvss_scores(scores: &[u32]) -> Vec<CvssBucket> {
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();

    for score in scores {
        *counts.entry(*score).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|(score, count)| CvssBucket { score, count })
        .collect()
}

/// Total CVEs across all aggregated services.
pub fn total_cves(entries: &[AggregatedServiceEntry]) -> u64 {
    entries
        .iter()
        .fold(0u64, |acc, e| acc.saturating_add(e.total_cve_count))
}
