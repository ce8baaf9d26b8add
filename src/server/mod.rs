//! HTTP surface of the metrics server.

mod handler;
mod listener;

pub use handler::{handle_request, respond};
pub use listener::MetricsServer;
