//! Configuration types and CLI options.
//!
//! This module defines the enums and structs used for command-line argument
//! parsing and for configuring the enrichment stage programmatically.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::constants::{
    DEFAULT_FIELD_SELECTION, DEFAULT_MAX_CONCURRENCY, DEFAULT_SAMPLE_RATE, LOOKUP_MAX_RETRIES,
    WHOIS_TIMEOUT_SECS,
};
use crate::whois::RetryPolicy;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Configuration of the enrichment stage itself.
///
/// Set once when the stage is constructed and immutable afterwards. The mask
/// and sample rate are kept as the raw strings a host configuration file
/// would carry; they are validated (and replaced by their defaults when
/// malformed) when an [`crate::Enricher`] is built.
///
/// # Examples
///
/// ```
/// use whois_enrich::FilterConfig;
///
/// let config = FilterConfig {
///     lookup_fields: vec!["domain_or_ip01".to_string()],
///     field_selection: "00000010101000000".to_string(),
///     ..Default::default()
/// };
/// assert_eq!(config.sample, "100");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Record attributes whose values are submitted as lookup queries, in order
    pub lookup_fields: Vec<String>,

    /// 17 characters of '0'/'1' choosing the derived attribute groups
    pub field_selection: String,

    /// Percentage (1-100) of records for which lookups are performed
    pub sample: String,

    /// Retry budget for each lookup field
    pub retry: RetryPolicy,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            lookup_fields: Vec::new(),
            field_selection: DEFAULT_FIELD_SELECTION.to_string(),
            sample: DEFAULT_SAMPLE_RATE.to_string(),
            retry: RetryPolicy::default(),
        }
    }
}

/// Batch run configuration (no CLI dependencies).
///
/// Used by [`crate::run_enrichment`] to enrich a newline-delimited JSON
/// stream of records.
#[derive(Debug, Clone)]
pub struct Config {
    /// File to read JSON records from (`-` for stdin)
    pub input: PathBuf,

    /// JSON fixture file backing a static directory (offline lookups)
    pub directory: Option<PathBuf>,

    /// Number of records enriched concurrently
    pub max_concurrency: usize,

    /// Enrichment stage settings
    pub filter: FilterConfig,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::from("-"),
            directory: None,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            filter: FilterConfig::default(),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}

/// Command-line options.
///
/// # Examples
///
/// ```bash
/// # Enrich two fields, emitting created/updated/expires timestamps
/// whois_enrich events.jsonl --lookup-field domain_or_ip01 \
///     --lookup-field ip_or_domain02 --field-selection 00000010101000000
///
/// # Offline run against a fixture directory, sampling 25% of records
/// cat events.jsonl | whois_enrich - --lookup-field host \
///     --directory fixtures/whois.json --sample 25
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "whois_enrich",
    about = "Enriches JSON log records with WHOIS registration metadata."
)]
pub struct Opt {
    /// File of newline-delimited JSON records (`-` for stdin)
    #[arg(value_parser, default_value = "-")]
    pub file: PathBuf,

    /// Record attribute to use as a lookup query (repeatable, in order)
    #[arg(long = "lookup-field", value_name = "FIELD")]
    pub lookup_fields: Vec<String>,

    /// 17-character mask of 0/1 choosing the derived attribute groups
    #[arg(long, default_value = DEFAULT_FIELD_SELECTION)]
    pub field_selection: String,

    /// Percentage (1-100) of records to enrich
    #[arg(long, default_value = DEFAULT_SAMPLE_RATE)]
    pub sample: String,

    /// JSON fixture file used as the directory instead of live lookups
    #[arg(long)]
    pub directory: Option<PathBuf>,

    /// Retries after the first failed lookup attempt
    #[arg(long, default_value_t = LOOKUP_MAX_RETRIES)]
    pub max_retries: usize,

    /// Fixed delay between lookup attempts in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub retry_delay_ms: u64,

    /// Per-attempt lookup timeout in seconds (0 disables the timeout)
    #[arg(long, default_value_t = WHOIS_TIMEOUT_SECS)]
    pub lookup_timeout_secs: u64,

    /// Number of records enriched concurrently
    #[arg(long, default_value_t = DEFAULT_MAX_CONCURRENCY)]
    pub max_concurrency: usize,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl From<Opt> for Config {
    fn from(opt: Opt) -> Self {
        let attempt_timeout =
            (opt.lookup_timeout_secs > 0).then(|| Duration::from_secs(opt.lookup_timeout_secs));
        Self {
            input: opt.file,
            directory: opt.directory,
            max_concurrency: opt.max_concurrency.max(1),
            filter: FilterConfig {
                lookup_fields: opt.lookup_fields,
                field_selection: opt.field_selection,
                sample: opt.sample,
                retry: RetryPolicy {
                    max_retries: opt.max_retries,
                    delay: Duration::from_millis(opt.retry_delay_ms),
                    attempt_timeout,
                },
            },
            log_level: opt.log_level,
            log_format: opt.log_format,
        }
    }
}
