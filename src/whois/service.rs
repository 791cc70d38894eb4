//! Live RDAP/WHOIS lookups through the `whois-service` crate.

use anyhow::Result;
use whois_service::WhoisClient;

use crate::error_handling::InitializationError;

use super::client::DirectoryClient;
use super::parse::convert_response;
use super::types::LookupResult;

/// [`DirectoryClient`] backed by `whois-service`.
///
/// whois-service tries RDAP first and falls back to WHOIS, handles IANA
/// bootstrap for TLD discovery and rate limits per server. The client is
/// created once and shared by every lookup.
pub struct WhoisServiceClient {
    client: WhoisClient,
}

impl WhoisServiceClient {
    /// Creates the underlying client (IANA bootstrap included).
    pub async fn new() -> Result<Self, InitializationError> {
        let client = WhoisClient::new()
            .await
            .map_err(|e| InitializationError::ClientError(e.to_string()))?;
        Ok(Self { client })
    }
}

impl DirectoryClient for WhoisServiceClient {
    async fn lookup(&self, query: &str) -> Result<LookupResult> {
        log::debug!("Starting WHOIS lookup for {}", query);
        let response = self
            .client
            .lookup(query)
            .await
            .map_err(|e| anyhow::anyhow!("WHOIS lookup failed for {}: {}", query, e))?;
        Ok(convert_response(query, &response))
    }
}
