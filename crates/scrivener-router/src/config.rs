//! Configuration file parsing for the Router.
//!
//! Loads the bind address, the optional webhook and the nested extractor and
//! LLM settings from a TOML file.

use scrivener_extractor::ExtractorConfig;
use scrivener_llm::LlmConfig;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Router configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A setting failed validation
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Router configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct RouterConfig {
    /// Bind address (e.g., "127.0.0.1")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Bind port (e.g., 5001)
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,

    /// URL that receives every batch result
    #[serde(default)]
    pub webhook_url: Option<String>,

    /// Webhook request timeout in seconds
    #[serde(default = "default_webhook_timeout")]
    pub webhook_timeout_secs: u64,

    /// Accept server-local paths as `file_url` (off: http(s) URLs only)
    #[serde(default)]
    pub allow_local_files: bool,

    /// Largest contract download accepted, in bytes
    #[serde(default = "default_max_download_bytes")]
    pub max_download_bytes: u64,

    /// Extraction settings
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Completion provider settings
    #[serde(default)]
    pub llm: LlmConfig,
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_bind_port() -> u16 {
    5001
}

fn default_webhook_timeout() -> u64 {
    10
}

fn default_max_download_bytes() -> u64 {
    scrivener_reader::DEFAULT_MAX_DOWNLOAD_BYTES
}

impl RouterConfig {
    /// Load configuration from a TOML file
    ///
    /// Relative registry and prompt paths are resolved against the directory
    /// holding the file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml(&contents)?;

        if let Some(base) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            config.extractor = config.extractor.rooted_at(base);
        }
        Ok(config)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: RouterConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.extractor
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("extractor: {}", e)))?;
        self.llm
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("llm: {}", e)))?;
        if self.max_download_bytes == 0 {
            return Err(ConfigError::Invalid("max_download_bytes must be > 0".to_string()));
        }
        if let Some(url) = &self.webhook_url {
            reqwest::Url::parse(url)
                .map_err(|e| ConfigError::Invalid(format!("webhook_url '{}': {}", url, e)))?;
        }
        Ok(())
    }

    /// Create a default configuration for testing (mock LLM, no webhook)
    pub fn default_test_config() -> Self {
        RouterConfig {
            bind_address: "127.0.0.1".to_string(),
            bind_port: 5001,
            webhook_url: None,
            webhook_timeout_secs: default_webhook_timeout(),
            allow_local_files: false,
            max_download_bytes: default_max_download_bytes(),
            extractor: ExtractorConfig::default(),
            llm: LlmConfig::mock("{}"),
        }
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}
