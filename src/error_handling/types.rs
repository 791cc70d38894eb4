//! Error type definitions.
//!
//! This module defines the error types and the enrichment event kinds that are
//! tracked while records flow through the stage.

use std::time::Duration;

use log::SetLoggerError;
use strum_macros::{EnumIter as EnumIterMacro, IntoStaticStr};
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error creating the directory-service client.
    #[error("Directory client initialization error: {0}")]
    ClientError(String),

    /// Error loading a static directory fixture.
    #[error("Directory fixture error: {0}")]
    FixtureError(String),
}

/// Errors produced while resolving one lookup query.
///
/// `Client` and `Timeout` describe a single failed attempt and are always
/// retried. `Exhausted` is what the caller sees once the retry budget is
/// spent; it never fails the enclosing record.
#[derive(Error, Debug)]
pub enum LookupError {
    /// The directory client reported a failure (network, protocol, parse).
    #[error("lookup of '{query}' failed: {message}")]
    Client {
        /// The lookup query
        query: String,
        /// Error message reported by the client
        message: String,
    },

    /// A single attempt exceeded the per-attempt timeout.
    #[error("lookup of '{query}' timed out after {}s", after.as_secs_f64())]
    Timeout {
        /// The lookup query
        query: String,
        /// Configured per-attempt timeout
        after: Duration,
    },

    /// Every attempt failed.
    #[error("unable to get whois information for '{query}' after {attempts} attempts")]
    Exhausted {
        /// The lookup query
        query: String,
        /// Total number of attempts made (initial attempt included)
        attempts: usize,
        /// The failure of the final attempt
        #[source]
        last: Box<LookupError>,
    },
}

impl LookupError {
    /// Number of attempts behind this error (1 for single-attempt failures).
    pub fn attempts(&self) -> usize {
        match self {
            LookupError::Exhausted { attempts, .. } => *attempts,
            _ => 1,
        }
    }
}

/// Notable events observed by the enrichment stage.
///
/// None of these are fatal; they are counted so that a run can report how
/// much enrichment was shed, skipped or degraded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum EnrichmentEvent {
    /// A record was handed back to the host pipeline
    RecordProcessed,
    /// The sampler rejected a record, no lookups ran
    RecordSampledOut,
    /// A configured lookup field was missing (or null) on a record
    FieldAbsent,
    /// A lookup field held a list with more than one element
    MultiValuedField,
    /// A lookup succeeded and its attributes were merged
    LookupSucceeded,
    /// A failed lookup attempt was retried
    LookupRetried,
    /// Every attempt for a lookup field failed
    LookupExhausted,
    /// The field selection mask was malformed and replaced by the default
    InvalidFieldSelection,
    /// The sample rate was malformed and replaced by the default
    InvalidSampleRate,
}
