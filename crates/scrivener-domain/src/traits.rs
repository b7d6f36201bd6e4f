//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use std::future::Future;

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (scrivener-llm). Calls are
/// blocking; callers running on an async runtime must move them off the
/// executor.
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Complete a prompt
    fn generate(&self, prompt: &str) -> Result<String, Self::Error>;

    /// Name of the model behind this provider, for logs and metadata
    fn model_name(&self) -> &str {
        "llm"
    }
}

/// Trait for turning a contract locator into raw text
///
/// Implemented by the ingestion layer (scrivener-reader). A locator is a
/// local path or a remote URL.
pub trait ContractReader {
    /// Error type for read operations
    type Error;

    /// Read the contract and return its text
    fn read_contract(
        &self,
        locator: &str,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send;
}

/// Trait for loading prompt templates by name
///
/// Implemented by the storage layer (scrivener-store).
pub trait TemplateSource {
    /// Error type for template lookups
    type Error;

    /// Load the template stored under `name`
    fn load_template(&self, name: &str) -> Result<String, Self::Error>;
}
