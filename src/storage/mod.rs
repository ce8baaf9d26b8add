//! Server-side metric storage.
//!
//! The HTTP surface only talks to the [`Storage`] trait, so any
//! implementation (the in-memory one below, or a test double) can be
//! plugged in behind an `Arc<dyn Storage>`.

mod memory;

pub use memory::MemStorage;

use crate::metric::{Counter, Gauge, MetricKind, UnknownKind};
use thiserror::Error;

/// Errors returned by storage operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("invalid {0} value")]
    InvalidValue(MetricKind),

    #[error("invalid metric type")]
    UnknownKind,

    #[error("{kind} '{name}' not found")]
    NotFound { kind: MetricKind, name: String },
}

impl From<UnknownKind> for StorageError {
    fn from(_: UnknownKind) -> Self {
        StorageError::UnknownKind
    }
}

/// Capability set the HTTP handlers need from a metric store.
///
/// Every method takes `&self`; implementations are shared across all
/// connection tasks and must serialize their own mutations.
pub trait Storage: Send + Sync {
    /// Merge a raw wire value into the store.
    ///
    /// Gauges overwrite, counters add. On any error the store is unchanged.
    fn update(&self, kind: &str, name: &str, value: &str) -> Result<(), StorageError>;

    /// Current value of a gauge.
    fn get_gauge(&self, name: &str) -> Result<Gauge, StorageError>;

    /// Current total of a counter.
    fn get_counter(&self, name: &str) -> Result<Counter, StorageError>;

    /// Every known metric rendered as `"name: value"`.
    fn get_metrics(&self) -> Vec<String>;
}

/// A raw value parsed according to its kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParsedValue {
    Gauge(Gauge),
    Counter(Counter),
}

/// Parse a `(kind, value)` pair from the wire.
pub fn parse_value(kind: &str, value: &str) -> Result<ParsedValue, StorageError> {
    match kind.parse::<MetricKind>()? {
        MetricKind::Gauge => match value.parse::<Gauge>() {
            // Out-of-range input such as `1e400` parses as infinity.
            Ok(v) if !v.is_infinite() || is_infinity_literal(value) => Ok(ParsedValue::Gauge(v)),
            _ => Err(StorageError::InvalidValue(MetricKind::Gauge)),
        },
        MetricKind::Counter => value
            .parse::<Counter>()
            .map(ParsedValue::Counter)
            .map_err(|_| StorageError::InvalidValue(MetricKind::Counter)),
    }
}

/// `inf` or `infinity` in any case, optionally signed.
fn is_infinity_literal(value: &str) -> bool {
    let unsigned = value.strip_prefix(['+', '-']).unwrap_or(value);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}
