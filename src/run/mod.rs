//! Batch enrichment of newline-delimited JSON records.
//!
//! This is the driver behind the CLI: it builds the directory client, runs
//! every input record through an [`Enricher`] and reports totals.

mod finalize;
mod stream;

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tokio::io::{AsyncRead, BufReader};

use crate::config::Config;
use crate::enrich::Enricher;
use crate::error_handling::{EnrichmentEvent, ProcessingStats};
use crate::initialization::init_static_directory;
use crate::whois::DirectoryClient;

pub use finalize::print_statistics;
pub use stream::{enrich_stream, StreamTotals};

/// Results of an enrichment run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Records written to the output
    pub total_records: usize,
    /// Records with at least one lookup field enriched
    pub enriched_records: usize,
    /// Records rejected by the sampler
    pub sampled_out: usize,
    /// Input lines skipped because they were not UTF-8 JSON objects
    pub malformed_lines: usize,
    /// Lookup fields whose retries were exhausted
    pub failed_lookups: usize,
    /// Elapsed time in seconds
    pub elapsed_seconds: f64,
}

/// Runs an enrichment pass with the provided configuration.
///
/// Records are read from `config.input` (`-` for stdin) and the enriched
/// records are written to stdout, one JSON object per line.
///
/// # Errors
///
/// Returns an error if the input cannot be opened or read, the output cannot
/// be written, or no directory client can be built.
pub async fn run_enrichment(config: Config) -> Result<RunReport> {
    let stats = Arc::new(ProcessingStats::new());

    if let Some(path) = &config.directory {
        let directory =
            init_static_directory(path).context("Failed to initialize static directory")?;
        return run_with_client(&config, directory, stats).await;
    }

    #[cfg(feature = "whois-service")]
    {
        log::info!("Using live WHOIS/RDAP lookups");
        let client = crate::whois::WhoisServiceClient::new()
            .await
            .context("Failed to initialize WHOIS client")?;
        run_with_client(&config, client, stats).await
    }

    #[cfg(not(feature = "whois-service"))]
    {
        anyhow::bail!(
            "No directory configured: pass --directory <fixture.json> \
             or build with the `whois-service` feature for live lookups"
        )
    }
}

/// Runs an enrichment pass against an explicit directory client.
pub async fn run_with_client<C: DirectoryClient>(
    config: &Config,
    client: C,
    stats: Arc<ProcessingStats>,
) -> Result<RunReport> {
    if config.filter.lookup_fields.is_empty() {
        log::warn!("No lookup fields configured, records will pass through unchanged");
    }

    let enricher = Enricher::with_stats(config.filter.clone(), client, Arc::clone(&stats));
    let reader = open_input(&config.input).await?;
    let mut stdout = tokio::io::stdout();

    let start = Instant::now();
    let totals = enrich_stream(&enricher, reader, &mut stdout, config.max_concurrency).await?;
    let elapsed_seconds = start.elapsed().as_secs_f64();

    print_statistics(&totals, &stats, elapsed_seconds);

    Ok(RunReport {
        total_records: totals.records,
        enriched_records: totals.enriched,
        sampled_out: totals.sampled_out,
        malformed_lines: totals.malformed,
        failed_lookups: stats.get_count(EnrichmentEvent::LookupExhausted),
        elapsed_seconds,
    })
}

async fn open_input(input: &Path) -> Result<BufReader<Box<dyn AsyncRead + Unpin + Send>>> {
    let reader: Box<dyn AsyncRead + Unpin + Send> = if input.as_os_str() == "-" {
        log::info!("Reading records from stdin");
        Box::new(tokio::io::stdin())
    } else {
        let file = tokio::fs::File::open(input)
            .await
            .with_context(|| format!("Failed to open input file {}", input.display()))?;
        Box::new(file)
    };
    Ok(BufReader::new(reader))
}
