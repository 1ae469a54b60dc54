use std::fs;
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
    /// Uses `~/.config/chatview/config.toml` on Unix/macOS, or the platform
    /// equivalent via `dirs::config_dir()`. Falls back to the current
    /// directory if config_dir is unavailable.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("chatview").join("config.toml")
    }

    /// Loads configuration from the default config file.
    ///
    /// - If the file doesn't exist, returns `Config::default()`.
    /// - If the file exists, parses it as TOML and validates.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Config::default());
        }
        Self::load_from(&path)
    }

    /// Loads and validates configuration from `path`.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
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
    /// - `max_rows` and `max_row_width` are within the platform's 1..=5
    /// - `id_namespace`, when set, is non-empty and contains no ':'
    pub fn validate(&self) -> Result<(), ConfigError> {
        let layout = &self.layout;
        if !(1..=5).contains(&layout.max_rows) {
            return Err(ConfigError::ValidationError {
                message: format!("layout.max_rows must be between 1 and 5, got {}", layout.max_rows),
            });
        }
        if !(1..=5).contains(&layout.max_row_width) {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "layout.max_row_width must be between 1 and 5, got {}",
                    layout.max_row_width
                ),
            });
        }

        if let Some(namespace) = &self.tracker.id_namespace {
            if namespace.is_empty() || namespace.contains(':') {
                return Err(ConfigError::ValidationError {
                    message: format!(
                        "tracker.id_namespace '{}' must be non-empty and contain no ':'",
                        namespace
                    ),
                });
            }
        }

        Ok(())
    }
}
