use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::types::Config;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

impl Config {
    /// Returns the path to the configuration file.
    ///
    /// Uses `~/.config/moodjournal/config.toml` on Unix/macOS,
    /// or equivalent on other platforms via `dirs::config_dir()`.
    /// Falls back to current directory if config_dir is unavailable.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("moodjournal").join("config.toml")
    }

    /// Loads configuration from the default config file.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from `path`.
    ///
    /// - If the file doesn't exist, returns `Config::default()`.
    /// - If the file exists, parses it as TOML and validates.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// Checks:
    /// - The repository endpoint is an absolute http(s) URL
    /// - Timeouts are non-zero
    /// - The service bind address parses as host:port
    pub fn validate(&self) -> Result<(), ConfigError> {
        let endpoint = &self.repository.endpoint;
        match reqwest::Url::parse(endpoint) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => {
                return Err(ConfigError::ValidationError {
                    message: format!(
                        "Repository endpoint '{}' must use http or https, not '{}'",
                        endpoint,
                        url.scheme()
                    ),
                });
            }
            Err(e) => {
                return Err(ConfigError::ValidationError {
                    message: format!("Repository endpoint '{}' is not a valid URL: {}", endpoint, e),
                });
            }
        }

        if self.repository.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError {
                message: "repository.timeout_seconds must be greater than zero".to_string(),
            });
        }

        if self.repository.connect_timeout_seconds == 0 {
            return Err(ConfigError::ValidationError {
                message: "repository.connect_timeout_seconds must be greater than zero".to_string(),
            });
        }

        if self.service.bind_addr.parse::<SocketAddr>().is_err() {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "Service bind address '{}' is not a valid host:port",
                    self.service.bind_addr
                ),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn rejects_non_http_endpoint() {
        let mut config = Config::default();
        config.repository.endpoint = "ftp://localhost:5000".to_string();
        match config.validate() {
            Err(ConfigError::ValidationError { message }) => assert!(message.contains("http")),
            other => panic!("expected ValidationError, got {other:?}"),
        }
    }

    #[test]
    fn rejects_relative_endpoint() {
        let mut config = Config::default();
        config.repository.endpoint = "/journal".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_timeout() {
        let mut config = Config::default();
        config.repository.timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_bad_bind_addr() {
        let mut config = Config::default();
        config.service.bind_addr = "localhost".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn config_path_ends_with_expected() {
        assert!(Config::config_path().ends_with("moodjournal/config.toml"));
    }
}
