// Shared test helpers: scripted directory clients and fixture results.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};

use whois_enrich::whois::{Nameserver, Registrar};
use whois_enrich::{DirectoryClient, FilterConfig, LookupResult, RetryPolicy};

#[allow(dead_code)] // Used by other test files
/// Fixed "now" used by enrichers under test: 2024-01-15 10:30:45 UTC.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 45)
        .single()
        .expect("valid fixed timestamp")
}

#[allow(dead_code)] // Used by other test files
/// Retry policy with the production attempt budget but no waiting.
pub fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_retries: 10,
        delay: Duration::from_millis(1),
        attempt_timeout: Some(Duration::from_secs(5)),
    }
}

#[allow(dead_code)] // Used by other test files
/// Filter config for `fields` with the given mask and sample rate.
pub fn filter_config(fields: &[&str], field_selection: &str, sample: &str) -> FilterConfig {
    FilterConfig {
        lookup_fields: fields.iter().map(|f| f.to_string()).collect(),
        field_selection: field_selection.to_string(),
        sample: sample.to_string(),
        retry: fast_retry(),
    }
}

/// A lookup result with every group populated.
#[allow(dead_code)] // Used by other test files
pub fn full_result() -> LookupResult {
    LookupResult {
        disclaimer: Some("For informational purposes only".to_string()),
        domain: Some("example.com".to_string()),
        domain_id: Some("2336799_DOMAIN_COM-VRSN".to_string()),
        status: Some("clientTransferProhibited".to_string()),
        registered: true,
        available: false,
        created_on: Utc.with_ymd_and_hms(1995, 8, 14, 4, 0, 0).single(),
        updated_on: Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 45).single(),
        expires_on: Utc.with_ymd_and_hms(2024, 1, 15, 11, 30, 45).single(),
        registrar: Some(Registrar {
            id: Some("376".to_string()),
            name: Some("RESERVED-Internet Assigned Numbers Authority".to_string()),
            organization: Some("IANA".to_string()),
            url: Some("http://res-dom.iana.org".to_string()),
        }),
        registrant_contacts: vec![],
        admin_contacts: vec![],
        technical_contacts: vec![],
        nameservers: vec![
            Nameserver {
                name: "a.iana-servers.net".to_string(),
                ipv4: Some("199.43.135.53".to_string()),
                ipv6: None,
            },
            Nameserver {
                name: "b.iana-servers.net".to_string(),
                ipv4: None,
                ipv6: Some("2001:500:8d::53".to_string()),
            },
        ],
    }
}

/// A lookup result carrying only a creation date.
#[allow(dead_code)] // Used by other test files
pub fn created_only(year: i32) -> LookupResult {
    LookupResult {
        registered: true,
        created_on: Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).single(),
        ..Default::default()
    }
}

/// Directory client that fails a configurable number of times per query
/// before answering, and records every call it receives.
#[derive(Default)]
pub struct ScriptedClient {
    answers: HashMap<String, LookupResult>,
    failures_before_success: HashMap<String, usize>,
    calls: Mutex<Vec<String>>,
    attempts: Mutex<HashMap<String, usize>>,
}

#[allow(dead_code)] // Used by other test files
impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers `query` with `result` on every attempt.
    pub fn answer(mut self, query: &str, result: LookupResult) -> Self {
        self.answers.insert(query.to_string(), result);
        self
    }

    /// Fails the first `failures` attempts for `query`.
    /// Queries with no answer fail forever.
    pub fn fail_first(mut self, query: &str, failures: usize) -> Self {
        self.failures_before_success
            .insert(query.to_string(), failures);
        self
    }

    /// Every query received, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    /// Number of calls received for `query`.
    pub fn calls_for(&self, query: &str) -> usize {
        self.calls().iter().filter(|q| q.as_str() == query).count()
    }
}

impl DirectoryClient for ScriptedClient {
    async fn lookup(&self, query: &str) -> anyhow::Result<LookupResult> {
        self.calls
            .lock()
            .expect("calls lock")
            .push(query.to_string());

        let attempt = {
            let mut attempts = self.attempts.lock().expect("attempts lock");
            let n = attempts.entry(query.to_string()).or_insert(0);
            *n += 1;
            *n
        };

        let failures = self
            .failures_before_success
            .get(query)
            .copied()
            .unwrap_or(0);
        if attempt <= failures {
            anyhow::bail!("connection reset by whois server (attempt {attempt})");
        }
        match self.answers.get(query) {
            Some(result) => Ok(result.clone()),
            None => anyhow::bail!("No WHOIS record for '{query}'"),
        }
    }
}

/// Hook that counts how often the stage marks a record processed.
#[derive(Default)]
pub struct CountingHook {
    count: AtomicUsize,
}

#[allow(dead_code)] // Used by other test files
impl CountingHook {
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl whois_enrich::ProcessedHook for CountingHook {
    fn mark_processed(&self, record: &mut whois_enrich::Record) {
        self.count.fetch_add(1, Ordering::SeqCst);
        record.insert("processed", true);
    }
}

/// Random source pinned to its maximum value: every sample draw lands at
/// the top of the range, so any rate below 100 rejects the record.
#[allow(dead_code)] // Used by other test files
pub struct MaxRng;

impl rand::RngCore for MaxRng {
    fn next_u32(&mut self) -> u32 {
        u32::MAX
    }

    fn next_u64(&mut self) -> u64 {
        u64::MAX
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        dst.fill(u8::MAX);
    }
}

/// Random source pinned to zero: every sample draw admits the record.
#[allow(dead_code)] // Used by other test files
pub struct ZeroRng;

impl rand::RngCore for ZeroRng {
    fn next_u32(&mut self) -> u32 {
        0
    }

    fn next_u64(&mut self) -> u64 {
        0
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        dst.fill(0);
    }
}
