//! Application initialization and resource setup.
//!
//! This module provides functions to initialize shared resources:
//! - Logger
//! - Directory-service client (static fixture or live lookups)

mod logger;

use std::path::Path;

use anyhow::Context;

use crate::error_handling::InitializationError;
use crate::whois::StaticDirectory;

// Re-export public API
pub use logger::init_logger_with;

/// Loads a [`StaticDirectory`] from a JSON fixture file.
///
/// # Errors
///
/// Returns `InitializationError::FixtureError` if the file cannot be read or
/// is not a JSON object of lookup results.
pub fn init_static_directory(path: &Path) -> Result<StaticDirectory, InitializationError> {
    let directory = StaticDirectory::from_json_file(path)
        .context("Failed to load static directory")
        .map_err(|e| InitializationError::FixtureError(format!("{e:#}")))?;
    log::info!(
        "Loaded {} WHOIS record(s) from {}",
        directory.len(),
        path.display()
    );
    Ok(directory)
}
