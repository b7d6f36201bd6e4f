//! Scrivener Domain Layer
//!
//! Core vocabulary for contract question answering. This crate performs no I/O:
//! it defines the value types every other layer exchanges and the trait seams
//! behind which ingestion, prompt storage and the language model live.
//!
//! ## Key Concepts
//!
//! - **Question**: a persisted natural-language question, identified by a question id
//! - **Answer category**: the typed shape expected of an answer (string, integer, float, date)
//! - **Answer**: a validated value, or the explicit `N/A` sentinel
//!
//! ## Architecture
//!
//! - Pure value types, no infrastructure
//! - Trait definitions for all external interactions
//! - Infrastructure implementations live in other crates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod answer;
pub mod date;
pub mod question;
pub mod traits;

// Re-exports for convenience
pub use answer::{Answer, AnswerCategory, AnswerValue, NOT_AVAILABLE};
pub use date::{format_day_first, parse_day_first};
pub use question::QuestionRecord;
