//! Configuration loading, parsing, and validation.

mod loader;
mod types;
mod validation;

pub use loader::{load_config, resolve_agent_config, resolve_server_config, ConfigError};
pub use types::*;
pub use validation::{validate_address, validate_agent_config, validate_server_config};
