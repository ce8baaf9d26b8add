//! Configuration file loading.

use crate::config::{
    validate_agent_config, validate_server_config, AgentConfig, Overrides, ServerConfig,
};
use serde::de::DeserializeOwned;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("configuration validation failed: {0}")]
    ValidationError(String),
}

/// Parse a YAML configuration file. Does not validate.
pub fn load_config<T, P>(path: P) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let contents = std::fs::read_to_string(path.as_ref())?;
    let config = serde_yaml::from_str(&contents)?;
    Ok(config)
}

/// Build the server configuration from an optional file plus overrides,
/// then validate it.
pub fn resolve_server_config(
    path: Option<&Path>,
    overrides: &Overrides,
) -> Result<ServerConfig, ConfigError> {
    let mut config: ServerConfig = match path {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    config.apply(overrides);
    validate_server_config(&config).map_err(ConfigError::ValidationError)?;
    Ok(config)
}

/// Build the agent configuration from an optional file plus overrides,
/// then validate it.
pub fn resolve_agent_config(
    path: Option<&Path>,
    overrides: &Overrides,
) -> Result<AgentConfig, ConfigError> {
    let mut config: AgentConfig = match path {
        Some(path) => load_config(path)?,
        None => AgentConfig::default(),
    };
    config.apply(overrides);
    validate_agent_config(&config).map_err(ConfigError::ValidationError)?;
    Ok(config)
}
