//! Processing statistics tracking.
//!
//! This module provides thread-safe counters for the enrichment events
//! observed while records are processed.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::types::EnrichmentEvent;

/// Thread-safe processing statistics tracker.
///
/// Tracks enrichment events using atomic counters, allowing concurrent access
/// from multiple tasks. Every event type is initialized to zero on creation.
///
/// # Thread Safety
///
/// This struct is thread-safe and can be shared across multiple tasks using `Arc`.
#[derive(Debug)]
pub struct ProcessingStats {
    events: HashMap<EnrichmentEvent, AtomicUsize>,
}

impl ProcessingStats {
    /// Creates a tracker with every event counter at zero.
    pub fn new() -> Self {
        let mut events = HashMap::new();
        for event in EnrichmentEvent::iter() {
            events.insert(event, AtomicUsize::new(0));
        }

        ProcessingStats { events }
    }

    /// Increment an event counter.
    pub fn increment(&self, event: EnrichmentEvent) {
        self.add(event, 1);
    }

    /// Add `count` occurrences of an event.
    pub fn add(&self, event: EnrichmentEvent, count: usize) {
        if let Some(counter) = self.events.get(&event) {
            counter.fetch_add(count, Ordering::Relaxed);
        } else {
            log::warn!(
                "Attempted to increment counter for {:?} which is not in the map. \
                 This indicates a bug in ProcessingStats initialization.",
                event
            );
        }
    }

    /// Get the count for an event type.
    ///
    /// Returns 0 if the event type is not in the map (should never happen if properly initialized).
    pub fn get_count(&self, event: EnrichmentEvent) -> usize {
        self.events
            .get(&event)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Snapshot of all non-zero counters, in declaration order.
    pub fn non_zero(&self) -> Vec<(EnrichmentEvent, usize)> {
        EnrichmentEvent::iter()
            .map(|e| (e, self.get_count(e)))
            .filter(|(_, count)| *count > 0)
            .collect()
    }
}

impl Default for ProcessingStats {
    fn default() -> Self {
        Self::new()
    }
}
