//! Provider configuration

use crate::{LlmError, MockProvider, OllamaProvider, VllmProvider};
use scrivener_domain::traits::LlmProvider as LlmProviderTrait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which completion backend to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Canned responses, no network
    Mock,
    /// Local Ollama server
    Ollama,
    /// vLLM / OpenAI-compatible completions server
    Vllm,
}

/// Sampling parameters sent with every completion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingParams {
    /// Maximum number of generated tokens
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f64,
    /// Nucleus sampling mass
    pub top_p: f64,
    /// Top-k cutoff
    pub top_k: u32,
}

impl Default for SamplingParams {
    /// Short, near-deterministic answers
    fn default() -> Self {
        Self {
            max_tokens: 128,
            temperature: 0.1,
            top_p: 0.95,
            top_k: 10,
        }
    }
}

/// Configuration for the completion provider
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Backend to use
    pub provider: ProviderKind,

    /// Base URL of the backend (ignored by the mock)
    pub endpoint: String,

    /// Model name
    pub model: String,

    /// Request timeout (seconds)
    pub timeout_secs: u64,

    /// Retry attempts per completion
    pub max_retries: u32,

    /// Sampling parameters
    #[serde(flatten)]
    pub sampling: SamplingParams,

    /// Fixed response returned by the mock provider
    pub mock_response: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Vllm,
            endpoint: crate::vllm::DEFAULT_ENDPOINT.to_string(),
            model: "mistralai/Mistral-7B-Instruct-v0.2".to_string(),
            timeout_secs: crate::vllm::DEFAULT_TIMEOUT_SECS,
            max_retries: crate::vllm::DEFAULT_MAX_RETRIES,
            sampling: SamplingParams::default(),
            mock_response: "{}".to_string(),
        }
    }
}

impl LlmConfig {
    /// Configuration for an offline mock provider
    pub fn mock(response: impl Into<String>) -> Self {
        Self {
            provider: ProviderKind::Mock,
            mock_response: response.into(),
            ..Self::default()
        }
    }

    /// Get the request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.provider != ProviderKind::Mock {
            if self.endpoint.trim().is_empty() {
                return Err("endpoint must not be empty".to_string());
            }
            if self.model.trim().is_empty() {
                return Err("model must not be empty".to_string());
            }
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }
        if self.max_retries > crate::MAX_RETRIES_LIMIT {
            return Err(format!(
                "max_retries {} exceeds the limit of {}",
                self.max_retries,
                crate::MAX_RETRIES_LIMIT
            ));
        }
        if self.sampling.max_tokens == 0 {
            return Err("max_tokens must be greater than 0".to_string());
        }
        if !(0.0..=2.0).contains(&self.sampling.temperature) {
            return Err(format!(
                "temperature {} out of range [0.0, 2.0]",
                self.sampling.temperature
            ));
        }
        if !(self.sampling.top_p > 0.0 && self.sampling.top_p <= 1.0) {
            return Err(format!("top_p {} out of range (0.0, 1.0]", self.sampling.top_p));
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize TOML: {}", e))
    }

    /// Build the configured provider
    pub fn build(&self) -> Result<ConfiguredProvider, LlmError> {
        self.validate().map_err(LlmError::Config)?;

        let provider = match self.provider {
            ProviderKind::Mock => ConfiguredProvider::Mock(MockProvider::new(&self.mock_response)),
            ProviderKind::Ollama => ConfiguredProvider::Ollama(
                OllamaProvider::new(&self.endpoint, &self.model)
                    .with_timeout(self.timeout())
                    .with_max_retries(self.max_retries)
                    .with_sampling(self.sampling),
            ),
            ProviderKind::Vllm => ConfiguredProvider::Vllm(
                VllmProvider::new(&self.endpoint, &self.model)
                    .with_timeout(self.timeout())
                    .with_max_retries(self.max_retries)
                    .with_sampling(self.sampling),
            ),
        };
        Ok(provider)
    }
}

/// A provider selected at runtime from configuration
pub enum ConfiguredProvider {
    /// Mock backend
    Mock(MockProvider),
    /// Ollama backend
    Ollama(OllamaProvider),
    /// vLLM backend
    Vllm(VllmProvider),
}

impl LlmProviderTrait for ConfiguredProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        match self {
            ConfiguredProvider::Mock(p) => LlmProviderTrait::generate(p, prompt),
            ConfiguredProvider::Ollama(p) => LlmProviderTrait::generate(p, prompt),
            ConfiguredProvider::Vllm(p) => LlmProviderTrait::generate(p, prompt),
        }
    }

    fn model_name(&self) -> &str {
        match self {
            ConfiguredProvider::Mock(p) => p.model_name(),
            ConfiguredProvider::Ollama(p) => p.model_name(),
            ConfiguredProvider::Vllm(p) => p.model_name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = LlmConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.sampling.max_tokens, 128);
        assert_eq!(config.sampling.top_k, 10);
    }

    #[test]
    fn test_invalid_top_p() {
        let mut config = LlmConfig::default();
        config.sampling.top_p = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_max_retries_is_bounded() {
        let mut config = LlmConfig::default();
        config.max_retries = crate::MAX_RETRIES_LIMIT;
        assert!(config.validate().is_ok());

        config.max_retries = 64;
        let err = config.validate().unwrap_err();
        assert!(err.contains("max_retries 64"));
        assert!(config.build().is_err());
    }

    #[test]
    fn test_empty_endpoint_only_matters_for_remote() {
        let mut config = LlmConfig::mock("{}");
        config.endpoint = String::new();
        assert!(config.validate().is_ok());

        config.provider = ProviderKind::Ollama;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_toml() {
        let config = LlmConfig::from_toml(
            r#"
            provider = "ollama"
            endpoint = "http://localhost:11434"
            model = "mistral"
            temperature = 0.0
            max_tokens = 256
            "#,
        )
        .unwrap();
        assert_eq!(config.provider, ProviderKind::Ollama);
        assert_eq!(config.model, "mistral");
        assert_eq!(config.sampling.max_tokens, 256);
        assert_eq!(config.sampling.top_p, 0.95);
    }

    #[test]
    fn test_build_mock() {
        let provider = LlmConfig::mock(r#"{"name": "x"}"#).build().unwrap();
        assert_eq!(provider.model_name(), "mock");
        assert_eq!(provider.generate("anything").unwrap(), r#"{"name": "x"}"#);
    }

    #[test]
    fn test_build_rejects_invalid() {
        let mut config = LlmConfig::default();
        config.timeout_secs = 0;
        assert!(matches!(config.build(), Err(LlmError::Config(_))));
    }
}
