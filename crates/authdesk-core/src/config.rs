//! Configuration management for authdesk.
//!
//! Loads configuration from ${AUTHDESK_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Env var overriding the configured API base URL.
pub const API_URL_ENV: &str = "AUTHDESK_API_URL";

/// Returns the default config template with comments.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for authdesk configuration and client storage.
    //!
    //! AUTHDESK_HOME resolution order:
    //! 1. AUTHDESK_HOME environment variable (if set)
    //! 2. ~/.config/authdesk (default)

    use std::path::PathBuf;

    /// Returns the authdesk home directory.
    pub fn authdesk_home() -> PathBuf {
        if let Ok(home) = std::env::var("AUTHDESK_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".authdesk"),
            |h| h.join(".config").join("authdesk"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        authdesk_home().join("config.toml")
    }

    /// Returns the path to the durable session slot.
    pub fn session_path() -> PathBuf {
        authdesk_home().join("session.json")
    }

    /// Returns the path holding the current client route.
    pub fn location_path() -> PathBuf {
        authdesk_home().join("location")
    }

    /// Returns the directory for rotated log files.
    pub fn logs_dir() -> PathBuf {
        authdesk_home().join("logs")
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter used when AUTHDESK_LOG is unset.
    pub level: String,
    /// Mirror logs into a daily file under the home directory.
    pub file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: false,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the authentication service
    pub api_base_url: String,
    /// Request timeout in seconds (0 or None = client default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
    pub logging: LoggingConfig,
}

impl Config {
    pub const DEFAULT_API_BASE_URL: &'static str = "https://be-task-3299.onrender.com/api/auth";

    /// Loads configuration from the default path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Writes the commented default template to `path`.
    ///
    /// Refuses to overwrite an existing file.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, default_config_template())
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }

    /// Resolves the API base URL with precedence: env > config > default.
    pub fn effective_base_url(&self) -> Result<String> {
        if let Ok(env_url) = std::env::var(API_URL_ENV) {
            let trimmed = env_url.trim();
            if !trimmed.is_empty() {
                validate_url(trimmed)?;
                return Ok(trimmed.to_string());
            }
        }

        let configured = self.api_base_url.trim();
        if !configured.is_empty() {
            validate_url(configured)?;
            return Ok(configured.to_string());
        }

        Ok(Self::DEFAULT_API_BASE_URL.to_string())
    }

    /// Returns the request timeout, or None to keep the client default.
    pub fn request_timeout(&self) -> Option<Duration> {
        match self.request_timeout_secs {
            None | Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: Self::DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: None,
            logging: LoggingConfig::default(),
        }
    }
}

/// Validates that a URL is well-formed.
fn validate_url(url: &str) -> Result<()> {
    url::Url::parse(url).with_context(|| format!("Invalid API base URL: {url}"))?;
    Ok(())
}
