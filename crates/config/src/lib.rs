//! Configuration management for leadlog
//!
//! Supports loading configuration from:
//! - TOML/YAML files under `config/` (`default`, then `{env}`)
//! - Environment variables (`LEADLOG__` prefix, `__` separator)
//! - Runtime overrides applied by the binary (CLI flags)

pub mod constants;
pub mod settings;

pub use settings::{
    load_settings, load_settings_from, ChatConfig, LlmSettings, ObservabilityConfig,
    RuntimeEnvironment, ServerConfig, Settings, StorageConfig,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
