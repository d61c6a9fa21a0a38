//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::{chat, endpoints, server, storage};
use crate::ConfigError;

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// Development mode - relaxed validation, warnings only
    #[default]
    Development,
    /// Production mode - all validations enforced
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// Event log location
    #[serde(default)]
    pub storage: StorageConfig,

    /// Chat completion backend
    #[serde(default)]
    pub llm: LlmSettings,

    /// Conversation behaviour
    #[serde(default)]
    pub chat: ChatConfig,

    /// HTTP read API
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Event log storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path of the JSON event log
    #[serde(default = "default_data_file")]
    pub data_file: String,
}

fn default_data_file() -> String {
    storage::DATA_FILE.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
        }
    }
}

/// Chat backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Ollama base URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries for connection failures (timeouts are not retried)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Sampling temperature; the server default applies when unset
    #[serde(default)]
    pub temperature: Option<f32>,

    /// How long Ollama keeps the model loaded between turns
    #[serde(default = "default_keep_alive")]
    pub keep_alive: String,
}

fn default_endpoint() -> String {
    endpoints::OLLAMA_DEFAULT.to_string()
}
fn default_model() -> String {
    chat::DEFAULT_MODEL.to_string()
}
fn default_timeout_secs() -> u64 {
    chat::TIMEOUT_SECS
}
fn default_max_retries() -> u32 {
    1
}
fn default_initial_backoff_ms() -> u64 {
    500
}
fn default_keep_alive() -> String {
    "5m".to_string()
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            temperature: None,
            keep_alive: default_keep_alive(),
        }
    }
}

/// Conversation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// First message of every conversation
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

fn default_system_prompt() -> String {
    chat::SYSTEM_PROMPT.to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// CORS allowed origins
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    server::HOST.to_string()
}
fn default_port() -> u16 {
    server::PORT
}
fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_enabled: true,
            cors_origins: Vec::new(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log level for the interactive chat, kept quiet so the transcript stays readable
    #[serde(default = "default_chat_log_level")]
    pub chat_log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,

    /// Record Prometheus metrics (`/metrics` in serve mode, `metrics_port` in chat mode)
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,

    /// Scrape port of the standalone exporter started by the chat command
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_chat_log_level() -> String {
    "warn".to_string()
}

fn default_metrics_port() -> u16 {
    9464
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            chat_log_level: default_chat_log_level(),
            log_json: false,
            metrics_enabled: true,
            metrics_port: default_metrics_port(),
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_storage()?;
        self.validate_llm()?;
        self.validate_server()?;
        self.validate_observability()?;
        Ok(())
    }

    fn validate_storage(&self) -> Result<(), ConfigError> {
        if self.storage.data_file.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "storage.data_file".to_string(),
                message: "Path cannot be empty".to_string(),
            });
        }
        Ok(())
    }

    fn validate_llm(&self) -> Result<(), ConfigError> {
        let llm = &self.llm;

        if llm.model.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "llm.model".to_string(),
                message: "Model name cannot be empty".to_string(),
            });
        }

        if !llm.endpoint.starts_with("http://") && !llm.endpoint.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                field: "llm.endpoint".to_string(),
                message: format!("Must be an http(s) URL, got '{}'", llm.endpoint),
            });
        }

        if llm.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "llm.timeout_secs".to_string(),
                message: "Timeout must be at least 1 second".to_string(),
            });
        }

        if let Some(temperature) = llm.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(ConfigError::InvalidValue {
                    field: "llm.temperature".to_string(),
                    message: format!("Must be between 0.0 and 2.0, got {}", temperature),
                });
            }
        }

        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        let server = &self.server;

        if server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                message: "Port cannot be 0".to_string(),
            });
        }

        if self.environment.is_production() && server.cors_enabled && server.cors_origins.is_empty()
        {
            tracing::warn!(
                "CORS is enabled in production but no origins are configured. \
                 Only localhost will be allowed."
            );
        }

        Ok(())
    }

    fn validate_observability(&self) -> Result<(), ConfigError> {
        let observability = &self.observability;

        if observability.metrics_enabled && observability.metrics_port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "observability.metrics_port".to_string(),
                message: "Port cannot be 0 while metrics are enabled".to_string(),
            });
        }

        if observability.metrics_enabled && observability.metrics_port == self.server.port {
            return Err(ConfigError::InvalidValue {
                field: "observability.metrics_port".to_string(),
                message: format!("Conflicts with server.port {}", self.server.port),
            });
        }

        Ok(())
    }
}

/// Load settings from `config/` and the environment
///
/// Priority: env vars > config/{env} > config/default > defaults
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    load_settings_from(Path::new("config"), env)
}

/// Load settings from an explicit configuration directory
pub fn load_settings_from(config_dir: &Path, env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::from(config_dir.join("default")).required(false));

    if let Some(env_name) = env {
        builder = builder.add_source(File::from(config_dir.join(env_name)).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("LEADLOG")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}
