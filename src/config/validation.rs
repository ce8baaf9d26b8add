//! Configuration validation.

use crate::config::{AgentConfig, LogConfig, ServerConfig};

/// Validate a `host:port` address.
///
/// The address must contain exactly one `:`, a non-empty host, and a
/// port that fits in a `u16`.
pub fn validate_address(address: &str) -> Result<(), String> {
    let parts: Vec<&str> = address.split(':').collect();
    if parts.len() != 2 {
        return Err(format!("address '{}' must be <host>:<port>", address));
    }

    let (host, port) = (parts[0], parts[1]);
    if host.is_empty() {
        return Err(format!("address '{}' is missing a host", address));
    }
    if port.is_empty() {
        return Err(format!("address '{}' is missing a port", address));
    }
    if port.parse::<u16>().is_err() {
        return Err(format!("address '{}' has an invalid port '{}'", address, port));
    }

    Ok(())
}

/// Validate the server configuration.
///
/// # Returns
///
/// `Ok(())` if valid, or an error message describing every problem.
pub fn validate_server_config(config: &ServerConfig) -> Result<(), String> {
    let mut errors = Vec::new();

    if let Err(e) = validate_address(&config.address) {
        errors.push(e);
    }
    validate_log(&config.log, &mut errors);

    finish(errors)
}

/// Validate the agent configuration.
///
/// Checks for:
/// - A well-formed server address
/// - Non-zero poll and report intervals
/// - A known log level
pub fn validate_agent_config(config: &AgentConfig) -> Result<(), String> {
    let mut errors = Vec::new();

    if let Err(e) = validate_address(&config.address) {
        errors.push(e);
    }
    if config.poll_interval.is_zero() {
        errors.push("poll interval must be greater than zero".to_string());
    }
    if config.report_interval.is_zero() {
        errors.push("report interval must be greater than zero".to_string());
    }
    validate_log(&config.log, &mut errors);

    finish(errors)
}

fn validate_log(log: &LogConfig, errors: &mut Vec<String>) {
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&log.level.to_lowercase().as_str()) {
        errors.push(format!(
            "invalid log level '{}', must be one of: {}",
            log.level,
            valid_levels.join(", ")
        ));
    }
}

fn finish(errors: Vec<String>) -> Result<(), String> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.join("; "))
    }
}
