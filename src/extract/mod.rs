//! Pattern-based extraction of CVE data from report text.
//!
//! Both extractors are tolerant: text that does not match simply yields
//! nothing. An empty result is a normal outcome for reports without
//! findings.

use crate::config::PatternConfig;
use crate::error::ChartError;
use crate::models::ServiceCveRecord;
use regex::Regex;
use tracing::debug;

/// Compiled extraction patterns.
#[derive(Debug, Clone)]
pub struct Extractor {
    service_record: Regex,
    cvss_score: Regex,
    min_cvss_score: u32,
}

impl Extractor {
    /// Compile the configured patterns.
    ///
    /// The service pattern must capture port, service and count; the
    /// score pattern must capture the decimal score.
    pub fn new(patterns: &PatternConfig, min_cvss_score: u32) -> Result<Self, ChartError> {
        let service_record = compile(&patterns.service_record, 3)?;
        let cvss_score = compile(&patterns.cvss_score, 1)?;

        Ok(Self {
            service_record,
            cvss_score,
            min_cvss_score,
        })
    }

    /// Find every `<port>: <service> (CVE Count: <n>)` entry with `n > 0`.
    pub fn extract_service_records(&self, text: &str) -> Vec<ServiceCveRecord> {
        let mut records = Vec::new();

        for caps in self.service_record.captures_iter(text) {
            let (Some(port), Some(service), Some(count)) = (caps.get(1), caps.get(2), caps.get(3))
            else {
                continue;
            };

            let Ok(port) = port.as_str().parse::<u16>() else {
                debug!("Skipping entry with invalid port: {}", &caps[0]);
                continue;
            };
            let Ok(cve_count) = count.as_str().parse::<u64>() else {
                debug!("Skipping entry with invalid CVE count: {}", &caps[0]);
                continue;
            };

            if cve_count == 0 {
                continue;
            }

            records.push(ServiceCveRecord::new(port, service.as_str(), cve_count));
        }

        debug!("Extracted {} service records with CVEs", records.len());
        records
    }

    /// Find bolded CVSS scores, rounded, keeping those above the threshold.
    pub fn extract_cvss_scores(&self, text: &str) -> Vec<u32> {
        let scores: Vec<u32> = self
            .cvss_score
            .captures_iter(text)
            .filter_map(|caps| caps.get(1)?.as_str().parse::<f64>().ok())
            .map(round_score)
            .filter(|score| *score > self.min_cvss_score)
            .collect();

        debug!(
            "Extracted {} CVSS scores above {}",
            scores.len(),
            self.min_cvss_score
        );
        scores
    }
}

/// Round half to even, so 6.5 becomes 6 and 7.5 becomes 8.
pub fn round_score(score: f64) -> u32 {
    // Saturating cast; scores are non-negative by construction of the pattern.
    score.round_ties_even() as u32
}

fn compile(pattern: &str, groups: usize) -> Result<Regex, ChartError> {
    let regex = Regex::new(pattern).map_err(|e| ChartError::Pattern(e.to_string()))?;

    // captures_len counts the implicit whole-match group.
    if regex.captures_len() < groups + 1 {
        return Err(ChartError::Pattern(format!(
            "'{}' must have at least {} capture group(s)",
            pattern, groups
        )));
    }

    Ok(regex)
}
