//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (defaults, retry budget, naming rules)
//! - Stage configuration (`FilterConfig`) and batch configuration (`Config`)
//! - CLI option types and parsing

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{Config, FilterConfig, LogFormat, LogLevel, Opt};
