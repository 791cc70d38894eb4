//! Enrichment orchestration for a single record.
//!
//! Per record: sample once, then for each configured lookup field in order
//! extract the query, look it up with bounded retry, flatten the result and
//! merge it into the record under the field's name. The host hook is called
//! exactly once per record on every path.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde_json::Value;

use crate::config::FilterConfig;
use crate::error_handling::{EnrichmentEvent, ProcessingStats};
use crate::flatten::flatten;
use crate::record::Record;
use crate::sampling::SampleRate;
use crate::selection::FieldSelection;
use crate::whois::{lookup_with_retry, DirectoryClient, RetryPolicy};

/// Host-pipeline callback signalling that the stage is done with a record.
pub trait ProcessedHook: Sync {
    /// Called once per record, after any enrichment.
    fn mark_processed(&self, record: &mut Record);
}

impl<F> ProcessedHook for F
where
    F: Fn(&mut Record) + Sync,
{
    fn mark_processed(&self, record: &mut Record) {
        self(record)
    }
}

/// What happened to one lookup field of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldOutcome {
    /// The field was missing, null, empty or not a scalar
    Absent,
    /// The lookup succeeded and its attributes were merged
    Enriched {
        /// Number of attributes written
        attributes: usize,
    },
    /// Every attempt failed; nothing was written for the field
    Failed {
        /// Directory calls made, initial attempt included
        attempts: usize,
    },
}

/// Summary of one [`Enricher::process`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordOutcome {
    /// The sampler rejected the record
    pub sampled_out: bool,
    /// Per-field outcomes, in configured order (empty when no lookups ran)
    pub fields: Vec<(String, FieldOutcome)>,
}

impl RecordOutcome {
    /// Number of fields whose attributes were merged into the record.
    pub fn enriched_fields(&self) -> usize {
        self.fields
            .iter()
            .filter(|(_, o)| matches!(o, FieldOutcome::Enriched { .. }))
            .count()
    }
}

/// The enrichment stage.
///
/// Configuration is validated once at construction: a malformed mask or
/// sample rate is replaced by its default and logged, never rejected.
pub struct Enricher<C> {
    lookup_fields: Vec<String>,
    selection: FieldSelection,
    sample_rate: SampleRate,
    retry: RetryPolicy,
    client: C,
    stats: Arc<ProcessingStats>,
    clock: fn() -> DateTime<Utc>,
}

impl<C: DirectoryClient> Enricher<C> {
    /// Creates an enricher with its own statistics counters.
    pub fn new(config: FilterConfig, client: C) -> Self {
        Self::with_stats(config, client, Arc::new(ProcessingStats::new()))
    }

    /// Like [`Enricher::new`], recording events into a shared `stats`.
    pub fn with_stats(config: FilterConfig, client: C, stats: Arc<ProcessingStats>) -> Self {
        let selection = FieldSelection::decode(&config.field_selection);
        if !selection.was_valid() {
            stats.increment(EnrichmentEvent::InvalidFieldSelection);
        }
        let sample_rate = SampleRate::parse(&config.sample);
        if !sample_rate.was_valid() {
            stats.increment(EnrichmentEvent::InvalidSampleRate);
        }

        Self {
            lookup_fields: config.lookup_fields,
            selection,
            sample_rate,
            retry: config.retry,
            client,
            stats,
            clock: Utc::now,
        }
    }

    /// Replaces the clock used for `*_delta` attributes.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// Event counters shared with this enricher.
    pub fn stats(&self) -> &Arc<ProcessingStats> {
        &self.stats
    }

    /// Effective field selection after validation.
    pub fn selection(&self) -> &FieldSelection {
        &self.selection
    }

    /// Effective sample rate after validation.
    pub fn sample_rate(&self) -> SampleRate {
        self.sample_rate
    }

    /// Enriches `record` in place and hands it to `hook`.
    pub async fn process<H: ProcessedHook>(&self, record: &mut Record, hook: &H) -> RecordOutcome {
        let admitted = !self.lookup_fields.is_empty() && {
            let mut rng = rand::rng();
            self.sample_rate.should_process(&mut rng)
        };
        self.run(record, hook, admitted).await
    }

    /// [`Enricher::process`] with a caller-supplied random source for sampling.
    pub async fn process_with_rng<H: ProcessedHook, R: Rng>(
        &self,
        record: &mut Record,
        hook: &H,
        rng: &mut R,
    ) -> RecordOutcome {
        let admitted =
            !self.lookup_fields.is_empty() && self.sample_rate.should_process(rng);
        self.run(record, hook, admitted).await
    }

    async fn run<H: ProcessedHook>(
        &self,
        record: &mut Record,
        hook: &H,
        admitted: bool,
    ) -> RecordOutcome {
        let mut outcome = RecordOutcome::default();

        if self.lookup_fields.is_empty() {
            log::trace!("No lookup fields configured, passing record through");
        } else if !admitted {
            log::debug!("Record sampled out, skipping WHOIS lookups");
            self.stats.increment(EnrichmentEvent::RecordSampledOut);
            outcome.sampled_out = true;
        } else {
            for field in &self.lookup_fields {
                let field_outcome = self.enrich_field(record, field).await;
                outcome.fields.push((field.clone(), field_outcome));
            }
        }

        hook.mark_processed(record);
        self.stats.increment(EnrichmentEvent::RecordProcessed);
        outcome
    }

    async fn enrich_field(&self, record: &mut Record, field: &str) -> FieldOutcome {
        let Some(query) = lookup_query(record.get(field), field, &self.stats) else {
            self.stats.increment(EnrichmentEvent::FieldAbsent);
            return FieldOutcome::Absent;
        };

        match lookup_with_retry(&self.client, &query, &self.retry, Some(&self.stats)).await {
            Ok(result) => {
                let attributes = flatten(&result, &self.selection, field, (self.clock)());
                let count = attributes.len();
                record.merge(attributes);
                self.stats.increment(EnrichmentEvent::LookupSucceeded);
                log::debug!("Merged {} WHOIS attributes for {}={}", count, field, query);
                FieldOutcome::Enriched { attributes: count }
            }
            Err(e) => {
                self.stats.increment(EnrichmentEvent::LookupExhausted);
                FieldOutcome::Failed {
                    attempts: e.attempts(),
                }
            }
        }
    }
}

/// Extracts the lookup query from a field value.
///
/// Strings are trimmed (empty means absent), numbers and booleans are
/// rendered, lists use their first element. Null, objects and nested lists
/// are absent.
fn lookup_query(value: Option<&Value>, field: &str, stats: &ProcessingStats) -> Option<String> {
    match value? {
        Value::Array(items) => {
            if items.len() > 1 {
                log::warn!(
                    "WHOIS: field '{}' holds {} values, only looking up the first: {}",
                    field,
                    items.len(),
                    Value::Array(items.clone())
                );
                stats.increment(EnrichmentEvent::MultiValuedField);
            }
            items.first().and_then(scalar_query)
        }
        other => scalar_query(other),
    }
}

fn scalar_query(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.len() != s.len() {
                log::debug!("Trimmed whitespace from lookup value {:?}", s);
            }
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stats() -> ProcessingStats {
        ProcessingStats::new()
    }

    #[test]
    fn test_lookup_query_scalars() {
        let s = stats();
        assert_eq!(
            lookup_query(Some(&json!(" example.com ")), "f", &s),
            Some("example.com".to_string())
        );
        assert_eq!(
            lookup_query(Some(&json!(3232235777u64)), "f", &s),
            Some("3232235777".to_string())
        );
        assert_eq!(lookup_query(Some(&json!("   ")), "f", &s), None);
        assert_eq!(lookup_query(Some(&Value::Null), "f", &s), None);
        assert_eq!(lookup_query(None, "f", &s), None);
        assert_eq!(lookup_query(Some(&json!({"a": 1})), "f", &s), None);
    }

    #[test]
    fn test_lookup_query_lists_use_first_element() {
        let s = stats();
        assert_eq!(
            lookup_query(Some(&json!(["a.com", "b.com"])), "f", &s),
            Some("a.com".to_string())
        );
        assert_eq!(s.get_count(EnrichmentEvent::MultiValuedField), 1);

        assert_eq!(
            lookup_query(Some(&json!(["only.com"])), "f", &s),
            Some("only.com".to_string())
        );
        assert_eq!(lookup_query(Some(&json!([])), "f", &s), None);
        assert_eq!(s.get_count(EnrichmentEvent::MultiValuedField), 1);
    }

    #[test]
    fn test_record_outcome_enriched_fields() {
        let outcome = RecordOutcome {
            sampled_out: false,
            fields: vec![
                ("a".to_string(), FieldOutcome::Enriched { attributes: 2 }),
                ("b".to_string(), FieldOutcome::Failed { attempts: 11 }),
                ("c".to_string(), FieldOutcome::Absent),
            ],
        };
        assert_eq!(outcome.enriched_fields(), 1);
    }
}
