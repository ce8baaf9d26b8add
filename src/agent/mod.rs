//! Metrics agent: samples runtime statistics on one timer and pushes the
//! latest snapshot to the server on another.

mod heap;
mod reporter;
mod runner;
mod sampler;

pub use heap::{alloc_stats, AllocStats, CountingAllocator};
pub use reporter::{PushError, ReportSummary, Reporter};
pub use runner::Agent;
pub use sampler::{random_value, RuntimeSampler, RANDOM_VALUE};
