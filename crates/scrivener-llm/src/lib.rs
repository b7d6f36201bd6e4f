//! Scrivener LLM Provider Layer
//!
//! Implementations of the completion function the extraction pipeline treats
//! as a black box.
//!
//! # Architecture
//!
//! This crate provides implementations of the `LlmProvider` trait from
//! `scrivener-domain`. Providers are blocking from the caller's point of view;
//! the HTTP providers drive their async clients on the ambient tokio runtime
//! when there is one.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `OllamaProvider`: Local Ollama API integration
//! - `VllmProvider`: vLLM (or any OpenAI-compatible) completions endpoint
//!
//! # Examples
//!
//! ```
//! use scrivener_llm::MockProvider;
//! use scrivener_domain::traits::LlmProvider;
//!
//! let provider = MockProvider::new(r#"{"name": "ACME GmbH"}"#);
//! let result = provider.generate("test prompt").unwrap();
//! assert_eq!(result, r#"{"name": "ACME GmbH"}"#);
//! ```

#![warn(missing_docs)]

pub mod config;
mod http;
pub mod ollama;
pub mod vllm;

use scrivener_domain::traits::LlmProvider as LlmProviderTrait;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

pub use config::{ConfiguredProvider, LlmConfig, ProviderKind, SamplingParams};
pub use http::MAX_RETRIES_LIMIT;
pub use ollama::OllamaProvider;
pub use vllm::VllmProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Invalid provider configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// Drive an async provider call to completion from blocking code
///
/// Reuses the ambient runtime when called from a blocking-pool thread and
/// falls back to a throwaway current-thread runtime otherwise.
pub(crate) fn block_on<F>(future: F) -> Result<String, LlmError>
where
    F: Future<Output = Result<String, LlmError>>,
{
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => handle.block_on(future),
        Err(_) => tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to start runtime: {}", e)))?
            .block_on(future),
    }
}

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Error,
}

/// Mock LLM provider for deterministic testing
///
/// Returns pre-configured responses without making any network calls. A
/// response registered with [`MockProvider::add_response`] is returned for
/// every prompt that contains its fragment; the first matching fragment wins.
///
/// # Examples
///
/// ```
/// use scrivener_llm::MockProvider;
/// use scrivener_domain::traits::LlmProvider;
///
/// // Simple fixed response
/// let provider = MockProvider::new("Fixed response");
/// assert_eq!(provider.generate("any prompt").unwrap(), "Fixed response");
///
/// // Responses selected by prompt content
/// let provider = MockProvider::default();
/// provider.add_response("start date", r#"{"date_found": "01.04.2023"}"#);
/// provider.add_response("employer", r#"{"name": "ACME GmbH"}"#);
/// assert_eq!(
///     provider.generate("What is the start date?").unwrap(),
///     r#"{"date_found": "01.04.2023"}"#
/// );
/// assert_eq!(provider.call_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    replies: Arc<Mutex<Vec<(String, MockReply)>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            replies: Arc::new(Mutex::new(Vec::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Respond with `response` to prompts containing `fragment`
    pub fn add_response(&self, fragment: impl Into<String>, response: impl Into<String>) {
        lock(&self.replies).push((fragment.into(), MockReply::Text(response.into())));
    }

    /// Builder form of [`MockProvider::add_response`]
    pub fn with_response(self, fragment: impl Into<String>, response: impl Into<String>) -> Self {
        self.add_response(fragment, response);
        self
    }

    /// Fail prompts containing `fragment`
    pub fn add_error(&self, fragment: impl Into<String>) {
        lock(&self.replies).push((fragment.into(), MockReply::Error));
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        lock(&self.prompts).len()
    }

    /// Every prompt received so far, in call order
    pub fn prompts(&self) -> Vec<String> {
        lock(&self.prompts).clone()
    }

    /// Forget recorded prompts
    pub fn reset_call_count(&self) {
        lock(&self.prompts).clear();
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        lock(&self.prompts).push(prompt.to_string());

        let replies = lock(&self.replies);
        match replies.iter().find(|(fragment, _)| prompt.contains(fragment.as_str())) {
            Some((_, MockReply::Text(response))) => Ok(response.clone()),
            Some((_, MockReply::Error)) => Err(LlmError::Other("Mock error".to_string())),
            None => Ok(self.default_response.clone()),
        }
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
