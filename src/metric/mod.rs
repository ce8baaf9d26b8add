//! Metric value model: the two metric kinds and the agent-side snapshot.

mod set;
mod types;

pub use set::{MetricSet, POLL_COUNT};
pub use types::{format_counter, format_gauge, Counter, Gauge, MetricKind, UnknownKind};
