//! WHOIS/RDAP lookup client adapter.
//!
//! This module provides:
//! - The structured lookup result handed to the flattener
//! - The [`DirectoryClient`] seam plus an in-memory implementation
//! - Bounded, fixed-interval retry around a single lookup
//! - A live client over the `whois-service` crate (feature `whois-service`)

mod client;
mod parse;
mod retry;
#[cfg(feature = "whois-service")]
mod service;
mod types;

// Re-export public API
pub use client::{DirectoryClient, StaticDirectory};
pub use retry::{lookup_with_retry, RetryPolicy};
#[cfg(feature = "whois-service")]
pub use service::WhoisServiceClient;
pub use types::{Contact, LookupResult, Nameserver, Registrar};
