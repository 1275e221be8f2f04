use anyhow::{Context, Result};

use crate::dataset::AggregatedRegionRecord;

/// Reads the aggregated-by-region table: a JSON array with one record per region.
pub fn read_aggregated_records(bytes: &[u8]) -> Result<Vec<AggregatedRegionRecord>> {
    serde_json::from_slice(bytes).context("Failed to parse aggregated region table")
}
