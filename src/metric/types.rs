//! Metric kinds and their text rendering.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Point-in-time value. Each update replaces the previous one.
pub type Gauge = f64;

/// Running total. Each update is added to the previous one.
pub type Counter = i64;

/// Kind tag carried in the first path segment of the update protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    Gauge,
    Counter,
}

/// Returned when a kind tag is neither `gauge` nor `counter`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid metric type")]
pub struct UnknownKind;

impl MetricKind {
    /// Wire tag for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Gauge => "gauge",
            MetricKind::Counter => "counter",
        }
    }
}

impl FromStr for MetricKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gauge" => Ok(MetricKind::Gauge),
            "counter" => Ok(MetricKind::Counter),
            _ => Err(UnknownKind),
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Render a gauge as the shortest decimal string that parses back to the
/// same value. Never uses exponent notation.
pub fn format_gauge(value: Gauge) -> String {
    value.to_string()
}

/// Render a counter as plain decimal.
pub fn format_counter(value: Counter) -> String {
    value.to_string()
}
