//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `whois_enrich` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - User-facing summary output
//!
//! Enriched records go to stdout; logs and the summary go to stderr.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use whois_enrich::initialization::init_logger_with;
use whois_enrich::{run_enrichment, Config, Opt};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from(Opt::parse());

    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    match run_enrichment(config).await {
        Ok(report) => {
            eprintln!(
                "✅ Enriched {} of {} record{} ({} sampled out, {} failed lookup{}, {} malformed line{}) in {:.1}s",
                report.enriched_records,
                report.total_records,
                if report.total_records == 1 { "" } else { "s" },
                report.sampled_out,
                report.failed_lookups,
                if report.failed_lookups == 1 { "" } else { "s" },
                report.malformed_lines,
                if report.malformed_lines == 1 { "" } else { "s" },
                report.elapsed_seconds
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("whois_enrich error: {:#}", e);
            process::exit(1);
        }
    }
}
