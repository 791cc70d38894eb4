//! Run finalization: statistics output.

use log::info;

use crate::error_handling::ProcessingStats;

use super::stream::StreamTotals;

/// Logs the run totals and every non-zero enrichment counter.
pub fn print_statistics(totals: &StreamTotals, stats: &ProcessingStats, elapsed_seconds: f64) {
    info!(
        "Run statistics: records={}, enriched={}, sampled_out={}, malformed_lines={} in {:.1}s",
        totals.records, totals.enriched, totals.sampled_out, totals.malformed, elapsed_seconds
    );

    let counts = stats.non_zero();
    if counts.is_empty() {
        return;
    }
    info!("Enrichment events:");
    for (event, count) in counts {
        let name: &'static str = event.into();
        info!("   {}: {}", name, count);
    }
}
