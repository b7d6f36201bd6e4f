//! Request and response types for extraction

use chrono::{DateTime, Utc};
use scrivener_domain::Answer;
use serde::Serialize;
use std::collections::BTreeMap;

/// Answers for every included question of one contract
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    /// Answer per question id; excluded questions have no entry
    pub answers: BTreeMap<String, Answer>,

    /// Metadata about the extraction
    pub metadata: ExtractionMetadata,
}

impl ExtractionResult {
    /// Number of answers that degraded to `N/A`
    pub fn not_available_count(&self) -> usize {
        self.answers.values().filter(|a| a.is_not_available()).count()
    }
}

/// Metadata about an extraction run
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionMetadata {
    /// When the run finished
    pub timestamp: DateTime<Utc>,

    /// Model that produced the answers
    pub model_name: String,

    /// Number of questions asked
    pub questions_asked: usize,

    /// Contract length after preprocessing (characters)
    pub contract_length: usize,

    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}
