//! Connection identifiers for log correlation.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for short request IDs.
static REQUEST_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a short, process-unique request ID.
///
/// Format: `req-{counter}` where counter is zero-padded to 16 hex digits.
pub fn generate_short_request_id() -> String {
    let count = REQUEST_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("req-{:016x}", count)
}

/// Request ID attached to a connection's tracing span.
#[derive(Clone, Debug)]
pub struct RequestId(String);

impl RequestId {
    /// Create a new short request ID.
    pub fn short() -> Self {
        Self(generate_short_request_id())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
