//! Error types for the storage layer

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Backing file is missing, has the wrong extension or holds malformed data
    #[error("Configuration error: {0}")]
    Config(String),

    /// Question id not present in the registry
    #[error("Question id not found: {0}")]
    NotFound(String),

    /// Prompt template could not be found
    #[error("Template not found: {}", .0.display())]
    TemplateNotFound(PathBuf),

    /// Rejected input (e.g. a template name escaping the prompt folder)
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Registry lock was poisoned by a panicking writer
    #[error("Registry lock poisoned")]
    LockPoisoned,

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error while persisting
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
