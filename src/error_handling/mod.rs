//! Error handling and processing statistics.
//!
//! This module provides:
//! - Error type definitions (initialization and lookup failures)
//! - Enrichment event kinds and their thread-safe counters
//!
//! Nothing in the enrichment stage is fatal to the host pipeline: config
//! violations fall back to defaults and lookup failures only leave a
//! record without some of its derived attributes.

mod stats;
mod types;

// Re-export public API
pub use stats::ProcessingStats;
pub use types::{EnrichmentEvent, InitializationError, LookupError};
