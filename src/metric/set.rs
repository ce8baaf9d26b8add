//! Agent-side metric snapshot.
//!
//! A `MetricSet` is immutable once published. Each poll derives the next
//! snapshot from the previous one instead of mutating it in place, so a
//! report that is still iterating an older snapshot is never disturbed.

use crate::metric::{format_counter, format_gauge, Counter, Gauge, MetricKind};
use std::collections::HashMap;

/// Counter incremented once per poll for the lifetime of the agent.
pub const POLL_COUNT: &str = "PollCount";

/// Snapshot of every gauge and counter the agent currently knows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricSet {
    gauges: HashMap<String, Gauge>,
    counters: HashMap<String, Counter>,
}

impl MetricSet {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the snapshot that follows this one after a poll.
    ///
    /// The gauge map is replaced wholesale by `gauges`; counters carry over
    /// and `PollCount` is incremented by one.
    pub fn next_poll(&self, gauges: HashMap<String, Gauge>) -> Self {
        let mut counters = self.counters.clone();
        let poll_count = counters.entry(POLL_COUNT.to_string()).or_insert(0);
        *poll_count = poll_count.wrapping_add(1);

        Self { gauges, counters }
    }

    /// All gauges in this snapshot.
    pub fn gauges(&self) -> &HashMap<String, Gauge> {
        &self.gauges
    }

    /// All counters in this snapshot.
    pub fn counters(&self) -> &HashMap<String, Counter> {
        &self.counters
    }

    pub fn gauge(&self, name: &str) -> Option<Gauge> {
        self.gauges.get(name).copied()
    }

    pub fn counter(&self, name: &str) -> Option<Counter> {
        self.counters.get(name).copied()
    }

    /// Number of polls folded into this snapshot.
    pub fn poll_count(&self) -> Counter {
        self.counter(POLL_COUNT).unwrap_or(0)
    }

    /// Total number of metrics (gauges and counters).
    pub fn len(&self) -> usize {
        self.gauges.len() + self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate every metric as `(kind, name, rendered value)`.
    ///
    /// Gauges come first, then counters. Order within a kind is unspecified.
    pub fn entries(&self) -> impl Iterator<Item = (MetricKind, &str, String)> + '_ {
        let gauges = self
            .gauges
            .iter()
            .map(|(name, value)| (MetricKind::Gauge, name.as_str(), format_gauge(*value)));
        let counters = self
            .counters
            .iter()
            .map(|(name, value)| (MetricKind::Counter, name.as_str(), format_counter(*value)));
        gauges.chain(counters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gauges(pairs: &[(&str, f64)]) -> HashMap<String, Gauge> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_new_set_is_empty() {
        let set = MetricSet::new();
        assert!(set.is_empty());
        assert_eq!(set.poll_count(), 0);
    }

    #[test]
    fn test_next_poll_replaces_gauges() {
        let first = MetricSet::new().next_poll(gauges(&[("Alloc", 1.0), ("Old", 2.0)]));
        let second = first.next_poll(gauges(&[("Alloc", 3.0)]));

        assert_eq!(second.gauge("Alloc"), Some(3.0));
        assert_eq!(second.gauge("Old"), None);
        assert_eq!(second.gauges().len(), 1);
    }

    #[test]
    fn test_next_poll_accumulates_poll_count() {
        let mut set = MetricSet::new();
        for _ in 0..5 {
            set = set.next_poll(HashMap::new());
        }
        assert_eq!(set.poll_count(), 5);
        assert_eq!(set.counter(POLL_COUNT), Some(5));
    }

    #[test]
    fn test_next_poll_leaves_previous_snapshot_untouched() {
        let first = MetricSet::new().next_poll(gauges(&[("Alloc", 1.0)]));
        let _second = first.next_poll(gauges(&[("Alloc", 2.0)]));

        assert_eq!(first.gauge("Alloc"), Some(1.0));
        assert_eq!(first.poll_count(), 1);
    }

    #[test]
    fn test_entries_cover_both_kinds() {
        let set = MetricSet::new().next_poll(gauges(&[("Alloc", 12345.6)]));
        let entries: Vec<_> = set.entries().collect();

        assert_eq!(entries.len(), 2);
        assert!(entries.contains(&(MetricKind::Gauge, "Alloc", "12345.6".to_string())));
        assert!(entries.contains(&(MetricKind::Counter, POLL_COUNT, "1".to_string())));
        assert_eq!(entries[0].0, MetricKind::Gauge);
    }
}
