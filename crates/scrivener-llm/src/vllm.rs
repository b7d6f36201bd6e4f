//! vLLM Provider Implementation
//!
//! Talks to the OpenAI-compatible `/v1/completions` endpoint that
//! `vllm serve` exposes. Any server speaking the same protocol works.
//!
//! # Examples
//!
//! ```no_run
//! use scrivener_llm::VllmProvider;
//!
//! let provider = VllmProvider::new(
//!     "http://localhost:8000",
//!     "mistralai/Mistral-7B-Instruct-v0.2",
//! );
//! ```

use crate::config::SamplingParams;
use crate::http::{build_client, post_json_with_retry};
use crate::LlmError;
use scrivener_domain::traits::LlmProvider as LlmProviderTrait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default vLLM API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000";

/// Default timeout for completion requests
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default number of retry attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Completion provider for a vLLM server
pub struct VllmProvider {
    endpoint: String,
    model: String,
    client: reqwest::Client,
    max_retries: u32,
    sampling: SamplingParams,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    temperature: f64,
    top_p: f64,
    // vLLM extension to the OpenAI schema
    top_k: u32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    text: String,
}

impl VllmProvider {
    /// Create a new vLLM provider
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            client: build_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            max_retries: DEFAULT_MAX_RETRIES,
            sampling: SamplingParams::default(),
        }
    }

    /// Set the maximum number of retry attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = build_client(timeout);
        self
    }

    /// Set the sampling parameters
    pub fn with_sampling(mut self, sampling: SamplingParams) -> Self {
        self.sampling = sampling;
        self
    }

    /// Complete a prompt
    pub async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/v1/completions", self.endpoint);
        let request_body = self.request_for(prompt);

        let response: CompletionResponse = post_json_with_retry(
            &self.client,
            &url,
            &request_body,
            &self.model,
            self.max_retries,
        )
        .await?;

        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.text)
            .ok_or_else(|| LlmError::InvalidResponse("Completion had no choices".to_string()))
    }

    fn request_for<'a>(&'a self, prompt: &'a str) -> CompletionRequest<'a> {
        CompletionRequest {
            model: &self.model,
            prompt,
            max_tokens: self.sampling.max_tokens,
            temperature: self.sampling.temperature,
            top_p: self.sampling.top_p,
            top_k: self.sampling.top_k,
        }
    }
}

impl LlmProviderTrait for VllmProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        crate::block_on(VllmProvider::generate(self, prompt))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
