//! whois_enrich library: WHOIS enrichment for event records
//!
//! This library provides a pipeline stage that looks up the values of
//! configured record fields in a WHOIS-style directory service and merges a
//! selectable set of flattened registration attributes back into the record.
//!
//! # Example
//!
//! ```no_run
//! use whois_enrich::{Enricher, FilterConfig, LookupResult, Record, StaticDirectory};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let directory = StaticDirectory::new().with_entry(
//!     "example.com",
//!     LookupResult {
//!         registered: true,
//!         created_on: "2020-01-01T00:00:00Z".parse().ok(),
//!         ..Default::default()
//!     },
//! );
//! let config = FilterConfig {
//!     lookup_fields: vec!["host".to_string()],
//!     ..Default::default()
//! };
//! let enricher = Enricher::new(config, directory);
//!
//! let mut record = Record::new();
//! record.insert("host", "example.com");
//! enricher.process(&mut record, &|_: &mut Record| {}).await;
//! // Default selection: creation and last-update timestamps
//! assert_eq!(
//!     record.get("host_whois_created_epoch"),
//!     Some(&serde_json::json!(1_577_836_800))
//! );
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

#![warn(missing_docs)]

pub mod config;
mod enrich;
pub mod error_handling;
mod flatten;
pub mod initialization;
mod record;
mod run;
mod sampling;
mod selection;
pub mod whois;

// Re-export public API
pub use config::{Config, FilterConfig, LogFormat, LogLevel, Opt};
pub use enrich::{Enricher, FieldOutcome, ProcessedHook, RecordOutcome};
pub use error_handling::{EnrichmentEvent, LookupError, ProcessingStats};
pub use flatten::{attribute_name, flatten, DerivedAttributes};
pub use record::Record;
pub use run::{
    enrich_stream, print_statistics, run_enrichment, run_with_client, RunReport, StreamTotals,
};
pub use sampling::SampleRate;
pub use selection::{AttributeGroup, FieldSelection};
pub use whois::{lookup_with_retry, DirectoryClient, LookupResult, RetryPolicy, StaticDirectory};
