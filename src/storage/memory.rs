//! In-memory metric storage.

use crate::metric::{format_counter, format_gauge, Counter, Gauge, MetricKind};
use crate::storage::{parse_value, ParsedValue, Storage, StorageError};
use dashmap::DashMap;

/// In-memory store backed by two sharded maps.
///
/// Counter increments run under the entry's shard lock, so concurrent
/// updates to the same counter are never lost.
#[derive(Debug, Default)]
pub struct MemStorage {
    gauges: DashMap<String, Gauge>,
    counters: DashMap<String, Counter>,
}

impl MemStorage {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct gauges.
    pub fn gauge_count(&self) -> usize {
        self.gauges.len()
    }

    /// Number of distinct counters.
    pub fn counter_count(&self) -> usize {
        self.counters.len()
    }
}

impl Storage for MemStorage {
    fn update(&self, kind: &str, name: &str, value: &str) -> Result<(), StorageError> {
        match parse_value(kind, value)? {
            ParsedValue::Gauge(v) => {
                self.gauges.insert(name.to_string(), v);
            }
            ParsedValue::Counter(delta) => {
                self.counters
                    .entry(name.to_string())
                    .and_modify(|total| *total = total.wrapping_add(delta))
                    .or_insert(delta);
            }
        }
        Ok(())
    }

    fn get_gauge(&self, name: &str) -> Result<Gauge, StorageError> {
        self.gauges
            .get(name)
            .map(|v| *v)
            .ok_or_else(|| StorageError::NotFound {
                kind: MetricKind::Gauge,
                name: name.to_string(),
            })
    }

    fn get_counter(&self, name: &str) -> Result<Counter, StorageError> {
        self.counters
            .get(name)
            .map(|v| *v)
            .ok_or_else(|| StorageError::NotFound {
                kind: MetricKind::Counter,
                name: name.to_string(),
            })
    }

    fn get_metrics(&self) -> Vec<String> {
        let mut gauges: Vec<(String, Gauge)> = self
            .gauges
            .iter()
            .map(|e| (e.key().clone(), *e.value()))
            .collect();
        gauges.sort_by(|a, b| a.0.cmp(&b.0));

        let mut counters: Vec<(String, Counter)> = self
            .counters
            .iter()
            .map(|e| (e.key().clone(), *e.value()))
            .collect();
        counters.sort_by(|a, b| a.0.cmp(&b.0));

        gauges
            .into_iter()
            .map(|(name, value)| format!("{}: {}", name, format_gauge(value)))
            .chain(
                counters
                    .into_iter()
                    .map(|(name, value)| format!("{}: {}", name, format_counter(value))),
            )
            .collect()
    }
}
