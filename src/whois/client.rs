//! Directory-service clients.
//!
//! The enrichment stage only needs one operation from a directory service:
//! resolve a query (domain name or IP address) to a [`LookupResult`].

use std::collections::HashMap;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use super::types::LookupResult;

/// A WHOIS-like directory service.
///
/// Implementations report every failure (network, protocol, malformed
/// response) as an error; retrying is the caller's job.
pub trait DirectoryClient: Send + Sync {
    /// Resolves `query` to a structured lookup result.
    fn lookup(&self, query: &str) -> impl Future<Output = Result<LookupResult>> + Send;
}

impl<C: DirectoryClient> DirectoryClient for Arc<C> {
    fn lookup(&self, query: &str) -> impl Future<Output = Result<LookupResult>> + Send {
        self.as_ref().lookup(query)
    }
}

/// In-memory directory keyed by query.
///
/// Keys are matched case-insensitively and without a trailing dot, so
/// `Example.COM.` finds the entry stored for `example.com`. Unknown queries
/// fail like an unreachable server would.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    entries: HashMap<String, LookupResult>,
}

impl StaticDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the entry for `query`.
    pub fn insert(&mut self, query: &str, result: LookupResult) {
        self.entries.insert(normalize_query(query), result);
    }

    /// Builder-style [`StaticDirectory::insert`].
    pub fn with_entry(mut self, query: &str, result: LookupResult) -> Self {
        self.insert(query, result);
        self
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the directory has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Loads a directory from a JSON object mapping queries to lookup results.
    ///
    /// ```json
    /// { "example.com": { "registered": true, "created_on": "1995-08-14" } }
    /// ```
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read directory file {}", path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("Failed to parse directory file {}", path.display()))
    }

    /// Parses a directory from JSON text (see [`StaticDirectory::from_json_file`]).
    pub fn from_json_str(content: &str) -> Result<Self> {
        let raw: HashMap<String, LookupResult> =
            serde_json::from_str(content).context("Invalid directory JSON")?;
        let mut directory = Self::new();
        for (query, result) in raw {
            directory.insert(&query, result);
        }
        Ok(directory)
    }
}

impl DirectoryClient for StaticDirectory {
    async fn lookup(&self, query: &str) -> Result<LookupResult> {
        self.entries
            .get(&normalize_query(query))
            .cloned()
            .with_context(|| format!("No WHOIS record for '{}'", query))
    }
}

fn normalize_query(query: &str) -> String {
    query.trim().trim_end_matches('.').to_ascii_lowercase()
}
