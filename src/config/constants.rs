//! Configuration constants.
//!
//! This module defines the defaults and fixed limits used by the enrichment
//! stage: the field selection mask, sampling, retry budget and naming rules.

use std::time::Duration;

// Field selection
/// Number of attribute groups addressed by a field selection mask
pub const FIELD_SELECTION_LEN: usize = 17;
/// Default field selection mask: `created` (position 6) and `updated` (position 8)
pub const DEFAULT_FIELD_SELECTION: &str = "00000010100000000";

// Sampling
/// Default sample rate in percent (no sampling)
pub const DEFAULT_SAMPLE_RATE: &str = "100";
/// Sample rate value that bypasses the random draw entirely
pub const FULL_SAMPLE_RATE: u8 = 100;
/// Upper bound (exclusive) of the per-record random draw
pub const SAMPLE_DRAW_RANGE: u32 = 100;

// Retry strategy
/// Maximum number of retries after the initial lookup attempt
/// Total calls per lookup field = 1 + LOOKUP_MAX_RETRIES
pub const LOOKUP_MAX_RETRIES: usize = 10;
/// Fixed delay between lookup attempts (not exponential)
pub const LOOKUP_RETRY_DELAY: Duration = Duration::from_secs(1);
/// Per-attempt timeout for a single directory lookup
/// Most WHOIS/RDAP queries complete in <2s; a hung server counts as a
/// transient failure and is retried.
pub const WHOIS_TIMEOUT_SECS: u64 = 5;

// Attribute naming
/// Infix between the lookup field name and the attribute suffix
pub const ATTRIBUTE_INFIX: &str = "_whois_";

// Batch driver
/// Default number of records enriched concurrently by the CLI driver
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;
/// Maximum length of an input line preview included in log messages
pub const MAX_LINE_PREVIEW_CHARS: usize = 200;
