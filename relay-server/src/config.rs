//! Configuration loading for chatrelay-server.
//!
//! Configuration is loaded from a TOML file (default: `chatrelay.toml`).
//! Every section and field has a default, so a partial or empty file works.

use serde::Deserialize;
use std::path::PathBuf;

/// Root configuration for chatrelay-server.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Request limits configuration.
    #[serde(default)]
    pub limits: LimitsConfig,
    /// HTTP endpoints configuration.
    #[serde(default)]
    pub http: HttpConfig,
    /// Background maintenance configuration.
    #[serde(default)]
    pub maintenance: MaintenanceConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address for the HTTP listener (default: 127.0.0.1:8000).
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

/// Request limits configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Maximum message body size in bytes (default: 64KB).
    #[serde(default = "default_max_message_bytes")]
    pub max_message_bytes: usize,
    /// Maximum posts per client address per minute (default: 120).
    #[serde(default = "default_posts_per_minute")]
    pub posts_per_minute: u32,
}

/// HTTP endpoints configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Enable metrics endpoint (default: true).
    #[serde(default = "default_metrics_enabled")]
    pub metrics_enabled: bool,
}

/// Background maintenance task configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MaintenanceConfig {
    /// Maintenance interval in seconds (default: 300 = 5 minutes).
    #[serde(default = "default_maintenance_interval")]
    pub interval_secs: u64,
    /// Enable maintenance task (default: true).
    #[serde(default = "default_maintenance_enabled")]
    pub enabled: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset (default: "info").
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions
fn default_bind_address() -> String {
    "127.0.0.1:8000".to_string()
}

fn default_max_message_bytes() -> usize {
    64 * 1024 // 64KB
}

fn default_posts_per_minute() -> u32 {
    120
}

fn default_metrics_enabled() -> bool {
    true
}

fn default_maintenance_interval() -> u64 {
    300 // 5 minutes
}

fn default_maintenance_enabled() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_message_bytes: default_max_message_bytes(),
            posts_per_minute: default_posts_per_minute(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: default_metrics_enabled(),
        }
    }
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_maintenance_interval(),
            enabled: default_maintenance_enabled(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or fails validation.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Reject values the relay cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.posts_per_minute == 0 {
            return Err(ConfigError::Invalid {
                field: "limits.posts_per_minute",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.maintenance.interval_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "maintenance.interval_secs",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Failed to parse configuration file.
    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: toml::de::Error,
    },
    /// A value is out of range.
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        /// Dotted name of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}
