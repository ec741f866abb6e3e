//! Configuration management for cluster-complete
//!
//! Settings come from a TOML file (by default
//! `~/.cluster-complete/config.toml`) and are overridden by command-line
//! flags. A missing file yields the defaults.
//!
//! Configuration precedence (highest to lowest):
//! 1. Command-line arguments
//! 2. Configuration file
//! 3. Default values

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use crate::cluster::SessionScope;
use crate::error::{ConfigError, Result};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Session scope defaults
    #[serde(default)]
    pub session: SessionConfig,

    /// Cluster adapter configuration
    #[serde(default)]
    pub cluster: ClusterConfig,

    /// Completion behaviour
    #[serde(default)]
    pub completion: CompletionConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Namespace, application and component the completions run against
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionConfig {
    #[serde(default = "default_namespace")]
    pub namespace: String,

    #[serde(default = "default_application")]
    pub application: String,

    /// Current component, may be empty outside a component directory
    #[serde(default)]
    pub component: String,
}

/// Cluster adapter configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClusterConfig {
    /// JSON snapshot read by the snapshot adapter
    #[serde(default)]
    pub snapshot_path: Option<PathBuf>,
}

/// Completion behaviour
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompletionConfig {
    /// Upper bound for a single cluster fetch in milliseconds
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,

    /// Keep only candidates starting with the word under the cursor
    #[serde(default = "default_true")]
    pub filter_by_prefix: bool,

    /// Order candidates before printing
    #[serde(default = "default_true")]
    pub sort: bool,

    /// Offer only successfully provisioned service instances to link/unlink
    #[serde(default)]
    pub require_provisioned_services: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// Enable timestamps in logs
    #[serde(default)]
    pub timestamps: bool,
}

/// Log level options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

// Default value functions
fn default_namespace() -> String {
    "default".to_string()
}

fn default_application() -> String {
    "app".to_string()
}

fn default_fetch_timeout_ms() -> u64 {
    2000
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> LogLevel {
    LogLevel::Warn
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            application: default_application(),
            component: String::new(),
        }
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_ms: default_fetch_timeout_ms(),
            filter_by_prefix: true,
            sort: true,
            require_provisioned_services: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            timestamps: false,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Explicit file, or `None` for the default location
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration, defaults when the file is missing
    pub fn load_from_file(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::default_config_path(),
        };

        if !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(&path)?;
        let config = Self::from_toml(&text)?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| ConfigError::InvalidFormat(e.to_string()).into())
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidFormat(e.to_string()).into())
    }

    /// Get the default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".cluster-complete")
            .join("config.toml")
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.completion.fetch_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "completion.fetch_timeout_ms".to_string(),
                value: "0".to_string(),
            }
            .into());
        }
        if self.session.namespace.trim().is_empty() {
            return Err(ConfigError::MissingField("session.namespace".to_string()).into());
        }
        if self.session.application.trim().is_empty() {
            return Err(ConfigError::MissingField("session.application".to_string()).into());
        }
        Ok(())
    }
}

impl SessionConfig {
    /// Session scope built from these settings
    pub fn scope(&self) -> SessionScope {
        SessionScope::new(&self.namespace, &self.application, &self.component)
    }
}

impl CompletionConfig {
    /// Get fetch timeout as Duration
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}
