//! Configuration data types.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Logging settings shared by both binaries.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LogConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

/// Metrics server configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ServerConfig {
    /// Listen address, `host:port`
    #[serde(default = "default_address")]
    pub address: String,

    /// Logging settings
    #[serde(default)]
    pub log: LogConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            log: LogConfig::default(),
        }
    }
}

/// Metrics agent configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct AgentConfig {
    /// Server address to report to, `host:port`
    #[serde(default = "default_address")]
    pub address: String,

    /// How often runtime statistics are sampled
    #[serde(default = "default_poll_interval", with = "humantime_serde")]
    pub poll_interval: Duration,

    /// How often the current snapshot is pushed to the server
    #[serde(default = "default_report_interval", with = "humantime_serde")]
    pub report_interval: Duration,

    /// Logging settings
    #[serde(default)]
    pub log: LogConfig,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            poll_interval: default_poll_interval(),
            report_interval: default_report_interval(),
            log: LogConfig::default(),
        }
    }
}

/// Command-line or environment values that take precedence over the
/// config file. `None` leaves the file (or default) value in place.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub address: Option<String>,
    pub poll_interval: Option<Duration>,
    pub report_interval: Option<Duration>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

impl LogConfig {
    fn apply(&mut self, overrides: &Overrides) {
        if let Some(level) = &overrides.log_level {
            self.level = level.clone();
        }
        if let Some(format) = &overrides.log_format {
            self.format = format.clone();
        }
    }
}

impl ServerConfig {
    /// Apply overrides in place. Interval overrides are ignored.
    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(address) = &overrides.address {
            self.address = address.clone();
        }
        self.log.apply(overrides);
    }
}

impl AgentConfig {
    /// Apply overrides in place.
    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(address) = &overrides.address {
            self.address = address.clone();
        }
        if let Some(interval) = overrides.poll_interval {
            self.poll_interval = interval;
        }
        if let Some(interval) = overrides.report_interval {
            self.report_interval = interval;
        }
        self.log.apply(overrides);
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_address() -> String {
    "localhost:8080".to_string()
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(2)
}

fn default_report_interval() -> Duration {
    Duration::from_secs(10)
}

/// Custom serde module for humantime durations.
mod humantime_serde {
    use serde::{self, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = humantime::format_duration(*duration).to_string();
        serializer.serialize_str(&s)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        humantime::parse_duration(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_defaults() {
        let config = AgentConfig::default();
        assert_eq!(config.address, "localhost:8080");
        assert_eq!(config.poll_interval, Duration::from_secs(2));
        assert_eq!(config.report_interval, Duration::from_secs(10));
        assert_eq!(config.log.level, "info");
        assert_eq!(config.log.format, LogFormat::Json);
    }

    #[test]
    fn test_agent_yaml_durations() {
        let yaml = r#"
address: "127.0.0.1:9090"
poll_interval: 500ms
report_interval: 1m
log:
  level: debug
  format: pretty
"#;
        let config: AgentConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.address, "127.0.0.1:9090");
        assert_eq!(config.poll_interval, Duration::from_millis(500));
        assert_eq!(config.report_interval, Duration::from_secs(60));
        assert_eq!(config.log.format, LogFormat::Pretty);
    }

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config: ServerConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn test_overrides_take_precedence() {
        let mut config = AgentConfig::default();
        config.apply(&Overrides {
            address: Some("127.0.0.1:9090".to_string()),
            poll_interval: Some(Duration::from_secs(5)),
            report_interval: None,
            log_level: Some("warn".to_string()),
            log_format: None,
        });

        assert_eq!(config.address, "127.0.0.1:9090");
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.report_interval, Duration::from_secs(10));
        assert_eq!(config.log.level, "warn");
        assert_eq!(config.log.format, LogFormat::Json);
    }

    #[test]
    fn test_server_ignores_interval_overrides() {
        let mut config = ServerConfig::default();
        config.apply(&Overrides {
            poll_interval: Some(Duration::from_secs(1)),
            ..Overrides::default()
        });
        assert_eq!(config, ServerConfig::default());
    }
}
