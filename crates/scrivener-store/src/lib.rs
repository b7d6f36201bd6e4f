//! Scrivener Storage Layer
//!
//! Durable state for the question-answering pipeline.
//!
//! # Architecture
//!
//! - [`QuestionRegistry`]: question id → record mapping, persisted as a JSON
//!   object and rewritten in full on every mutation
//! - [`PromptStore`]: a folder of plain-text prompt templates, addressed by
//!   file name
//!
//! # Examples
//!
//! ```no_run
//! use scrivener_store::{PromptStore, QuestionRegistry};
//!
//! let registry = QuestionRegistry::open("question_id_list.json").unwrap();
//! let prompts = PromptStore::new("prompts");
//! for (id, record) in registry.included() {
//!     println!("{} -> {}", id, record.prompt_file);
//! }
//! ```

#![warn(missing_docs)]

mod error;
mod prompts;
mod registry;

pub use error::StoreError;
pub use prompts::PromptStore;
pub use registry::QuestionRegistry;
