//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/rollgate/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/rollgate/` (~/.config/rollgate/)
//! - State/Logs: `$XDG_STATE_HOME/rollgate/` (~/.local/state/rollgate/)

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Rollbar collector configuration
    #[serde(default)]
    pub rollbar: RollbarConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Severity level of a Rollbar item
///
/// Serialized with lowercase names, matching the strings the item API expects.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
    Critical,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warning => "warning",
            Level::Error => "error",
            Level::Critical => "critical",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warning" => Ok(Level::Warning),
            "error" => Ok(Level::Error),
            "critical" => Ok(Level::Critical),
            _ => Err(format!("unknown level: {}", s)),
        }
    }
}

/// Rollbar collector configuration
///
/// Defaults apply to every event; an event can override `level`, `format`
/// and `access_token` through its `rollbar` sub-mapping (see `ItemBuilder`).
#[derive(Debug, Deserialize, Clone)]
pub struct RollbarConfig {
    /// Project access token with post_server_item permissions (required)
    pub access_token: Option<String>,

    /// Default environment reported for every item
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Default item level
    #[serde(default)]
    pub level: Level,

    /// Default message format, rendered against event fields
    #[serde(default = "default_format")]
    pub format: String,

    /// Rollbar item API endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Verify the collector's TLS certificate
    ///
    /// Skipping verification is an explicit per-deployment choice, never
    /// a silent default.
    #[serde(default = "default_verify_certs")]
    pub verify_certs: bool,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for RollbarConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            environment: default_environment(),
            level: Level::default(),
            format: default_format(),
            endpoint: default_endpoint(),
            verify_certs: default_verify_certs(),
            timeout_secs: default_timeout(),
        }
    }
}

impl RollbarConfig {
    /// Validate configuration, returning error message if invalid
    ///
    /// This is the one place construction fails loudly: a missing token or
    /// an unusable endpoint is fatal at startup, not degraded per event.
    pub fn validate(&self) -> Result<()> {
        match &self.access_token {
            None => {
                return Err(Error::Config(
                    "rollbar.access_token is required".to_string(),
                ));
            }
            Some(token) if token.is_empty() => {
                return Err(Error::Config(
                    "rollbar.access_token must not be empty".to_string(),
                ));
            }
            Some(_) => {}
        }
        if self.endpoint.is_empty() {
            return Err(Error::Config("rollbar.endpoint must not be empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(Error::Config(
                "rollbar.timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// The configured token, after `validate()` has passed.
    pub(crate) fn token(&self) -> &str {
        self.access_token.as_deref().unwrap_or_default()
    }
}

fn default_environment() -> String {
    "production".to_string()
}

fn default_format() -> String {
    "%{message}".to_string()
}

fn default_endpoint() -> String {
    "https://api.rollbar.com/api/1/item/".to_string()
}

fn default_verify_certs() -> bool {
    true
}

fn default_timeout() -> u64 {
    30
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/rollgate/config.toml` (~/.config/rollgate/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("rollgate").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/rollgate/` (~/.local/state/rollgate/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("rollgate")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/rollgate/rollgate.log` (~/.local/state/rollgate/rollgate.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("rollgate.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.rollbar.access_token.is_none());
        assert_eq!(config.rollbar.environment, "production");
        assert_eq!(config.rollbar.level, Level::Info);
        assert_eq!(config.rollbar.format, "%{message}");
        assert_eq!(config.rollbar.endpoint, "https://api.rollbar.com/api/1/item/");
        assert!(config.rollbar.verify_certs);
        assert_eq!(config.rollbar.timeout_secs, 30);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[rollbar]
access_token = "post-server-item-token"
environment = "staging"
level = "warning"
format = "host %{host}: %{message}"
verify_certs = false

[logging]
level = "debug"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(
            config.rollbar.access_token.as_deref(),
            Some("post-server-item-token")
        );
        assert_eq!(config.rollbar.environment, "staging");
        assert_eq!(config.rollbar.level, Level::Warning);
        assert_eq!(config.rollbar.format, "host %{host}: %{message}");
        assert!(!config.rollbar.verify_certs);
        // Unset keys keep their defaults
        assert_eq!(config.rollbar.endpoint, "https://api.rollbar.com/api/1/item/");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[rollbar]\naccess_token = \"tok\"\nenvironment = \"staging\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.rollbar.access_token.as_deref(), Some("tok"));
        assert_eq!(config.rollbar.environment, "staging");
        assert!(config.rollbar.validate().is_ok());
    }

    #[test]
    fn test_load_from_missing_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");

        match Config::load_from(&path) {
            Err(Error::Config(msg)) => assert!(msg.contains("failed to read config file")),
            other => panic!("expected config error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_validation_requires_token() {
        let config = RollbarConfig::default();
        assert!(config.validate().is_err());

        let config = RollbarConfig {
            access_token: Some(String::new()),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = RollbarConfig {
            access_token: Some("tok".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_zero_timeout() {
        let config = RollbarConfig {
            access_token: Some("tok".to_string()),
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_level_round_trip() {
        for (name, level) in [
            ("debug", Level::Debug),
            ("info", Level::Info),
            ("warning", Level::Warning),
            ("error", Level::Error),
            ("critical", Level::Critical),
        ] {
            assert_eq!(name.parse::<Level>().unwrap(), level);
            assert_eq!(level.as_str(), name);
        }
        assert!("fatal".parse::<Level>().is_err());
    }
}
