//! Bounded retry around a single directory lookup.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio_retry::strategy::FixedInterval;
use tokio_retry::Retry;

use crate::config::{LOOKUP_MAX_RETRIES, LOOKUP_RETRY_DELAY, WHOIS_TIMEOUT_SECS};
use crate::error_handling::{EnrichmentEvent, LookupError, ProcessingStats};

use super::client::DirectoryClient;
use super::types::LookupResult;

/// Retry budget for one lookup field.
///
/// A failed attempt is retried up to `max_retries` times with a fixed
/// `delay` between attempts. Each attempt may be bounded by
/// `attempt_timeout`; hitting it counts as a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Retries after the initial attempt
    pub max_retries: usize,
    /// Fixed wait between attempts
    pub delay: Duration,
    /// Bound on a single attempt (`None` waits indefinitely)
    pub attempt_timeout: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: LOOKUP_MAX_RETRIES,
            delay: LOOKUP_RETRY_DELAY,
            attempt_timeout: Some(Duration::from_secs(WHOIS_TIMEOUT_SECS)),
        }
    }
}

impl RetryPolicy {
    /// Delays between attempts: `max_retries` copies of `delay`.
    pub fn strategy(&self) -> impl Iterator<Item = Duration> {
        FixedInterval::new(self.delay).take(self.max_retries)
    }

    /// Upper bound on the number of calls made to the directory client.
    pub fn max_attempts(&self) -> usize {
        self.max_retries + 1
    }
}

/// Looks up `query`, retrying transient failures per `policy`.
///
/// Every failure that will be retried is logged with its message. When the
/// budget is spent a single warning is logged and
/// [`LookupError::Exhausted`] is returned.
pub async fn lookup_with_retry<C: DirectoryClient>(
    client: &C,
    query: &str,
    policy: &RetryPolicy,
    stats: Option<&ProcessingStats>,
) -> Result<LookupResult, LookupError> {
    let mut attempts = 0usize;
    let max_retries = policy.max_retries;
    let attempt_timeout = policy.attempt_timeout;

    let result = Retry::spawn(policy.strategy(), || {
        attempts += 1;
        let attempt = attempts;
        async move {
            let outcome = attempt_lookup(client, query, attempt_timeout).await;
            if let Err(e) = &outcome {
                if attempt <= max_retries {
                    log::warn!(
                        "WHOIS: exception thrown, will try again (attempt {}/{}): {}",
                        attempt,
                        max_retries + 1,
                        e
                    );
                    if let Some(stats) = stats {
                        stats.increment(EnrichmentEvent::LookupRetried);
                    }
                }
            }
            outcome
        }
    })
    .await;

    match result {
        Ok(lookup) => {
            log::debug!("WHOIS lookup for '{}' succeeded after {} attempt(s)", query, attempts);
            Ok(lookup)
        }
        Err(last) => {
            log::warn!(
                "WHOIS: Unable to get whois information for '{}' after {} attempts: {}",
                query,
                attempts,
                last
            );
            Err(LookupError::Exhausted {
                query: query.to_string(),
                attempts,
                last: Box::new(last),
            })
        }
    }
}

async fn attempt_lookup<C: DirectoryClient>(
    client: &C,
    query: &str,
    attempt_timeout: Option<Duration>,
) -> Result<LookupResult, LookupError> {
    let lookup = client.lookup(query);
    let outcome = match attempt_timeout {
        Some(limit) => tokio::time::timeout(limit, lookup)
            .await
            .map_err(|_| LookupError::Timeout {
                query: query.to_string(),
                after: limit,
            })?,
        None => lookup.await,
    };
    outcome.map_err(|e| LookupError::Client {
        query: query.to_string(),
        message: format!("{e:#}"),
    })
}
