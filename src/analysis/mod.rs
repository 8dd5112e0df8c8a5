//! Aggregation of extracted CVE data.

pub mod aggregator;

pub use aggregator::*;
