//! Scrivener Extractor
//!
//! Answers persisted natural-language questions about contract text with an
//! LLM and turns the free-form output into typed, validated answers.
//!
//! # Architecture
//!
//! ```text
//! QuestionRegistry + prompt template → rendered prompt → LLM → raw text
//!     → Answer parser (SchemaRegistry) → Answer | N/A → ExtractionResult
//! ```
//!
//! # Failure handling
//!
//! - Unknown question ids and configuration problems fail the request.
//! - A failing completion call fails the request; there are no retries here.
//! - Unusable model output never fails: the answer becomes `N/A`.
//!
//! # Example Usage
//!
//! ```no_run
//! use scrivener_extractor::{ExtractionContext, Extractor, ExtractorConfig, SchemaRegistry};
//! use scrivener_llm::MockProvider;
//! use scrivener_store::{PromptStore, QuestionRegistry};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = QuestionRegistry::open("question_id_list.json")?;
//! let prompts = PromptStore::new("prompts");
//! let schemas = SchemaRegistry::default();
//! let ctx = ExtractionContext::new(&registry, &schemas, &prompts);
//!
//! let extractor = Extractor::new(
//!     MockProvider::new(r#"{"start_date": "01.04.2023"}"#),
//!     ExtractorConfig::default(),
//! );
//! let contract = extractor.prepare_contract("... Beginn: 01.04.2023 ...");
//!
//! let start = extractor.answer_one(&contract, "start_date", &ctx).await?;
//! println!("start_date = {}", start);
//!
//! let result = extractor.answer_all(&contract, &ctx).await?;
//! println!("{} answers", result.answers.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod authoring;
mod config;
mod error;
mod evaluation;
mod extractor;
mod parser;
mod preprocess;
mod prompt;
mod schema;
mod types;


pub use authoring::{
    include_new_question, pair_ground_truth, AuthoredQuestion, EvaluationSample, QuestionDraft,
};
pub use config::ExtractorConfig;
pub use error::ExtractorError;
pub use evaluation::{
    clean_string, string_matches, EvaluationReport, Evaluator, SampleOutcome,
    DEFAULT_STRING_DISTANCE_THRESHOLD,
};
pub use extractor::{ExtractionContext, Extractor};
pub use parser::{parse_output, parse_responses};
pub use preprocess::{collapse_letter_spacing, collapse_whitespace, preprocess};
pub use prompt::{bind_contract, format_instructions, render, PromptBuilder, CONTRACT_PLACEHOLDER};
pub use schema::{validate_value, AnswerSchema, FieldSpec, SchemaRegistry};
pub use types::{ExtractionMetadata, ExtractionResult};
