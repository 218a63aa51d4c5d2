//! Configuration module for the provisioning engine.
//!
//! Provides the engine's operational defaults with YAML loading and
//! validation.
//!
//! # Usage
//!
//! ```rust,ignore
//! use provisioning_engine::config::{EngineConfig, load_config};
//!
//! // Load from a config file
//! let config = load_config("engine.yaml")?;
//!
//! // Or take the defaults
//! let config = EngineConfig::default();
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Provisioning lead time assumed when a catalog service does not
    /// declare one, in hours.
    #[serde(default = "default_provisioning_hours")]
    pub default_provisioning_hours: u32,
    /// How many times a use case re-reads and re-applies a transition after
    /// a versioned save loses to a concurrent writer, before surfacing a
    /// conflict.
    #[serde(default = "default_max_save_retries")]
    pub max_save_retries: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_provisioning_hours: default_provisioning_hours(),
            max_save_retries: default_max_save_retries(),
        }
    }
}

impl EngineConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns error if any value is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_provisioning_hours == 0 {
            return Err(ConfigError::ValidationError(
                "default_provisioning_hours must be at least 1".to_string(),
            ));
        }
        if self.max_save_retries == 0 {
            return Err(ConfigError::ValidationError(
                "max_save_retries must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load and validate engine configuration from a YAML file.
///
/// # Errors
///
/// Returns error if the file cannot be read, parsed or validated.
pub fn load_config(path: &str) -> Result<EngineConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
        path: path.to_string(),
        source,
    })?;
    let config: EngineConfig = serde_yaml_bw::from_str(&contents)?;
    config.validate()?;
    Ok(config)
}

const fn default_provisioning_hours() -> u32 {
    24
}

const fn default_max_save_retries() -> u32 {
    3
}
