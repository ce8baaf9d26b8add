//! rustmetrics - a minimal metrics pipeline
//!
//! This crate provides:
//! - An in-memory metrics server accepting gauge and counter updates over HTTP
//! - An agent that samples runtime statistics and pushes them to the server
//! - The `/update/{kind}/{name}/{value}` wire protocol shared by both

pub mod agent;
pub mod config;
pub mod metric;
pub mod protocol;
pub mod server;
pub mod storage;
pub mod util;

pub use metric::{MetricKind, MetricSet};
pub use storage::{MemStorage, Storage, StorageError};
