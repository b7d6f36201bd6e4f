//! Question records - the persisted description of one question

use serde::{Deserialize, Deserializer, Serialize};

/// A persisted question, keyed by its question id in the registry
///
/// The record itself does not carry the id; the registry owns the mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    /// Name of the prompt template file holding the question
    pub prompt_file: String,

    /// Name of the answer schema the output is parsed with
    #[serde(alias = "pydantic_object")]
    pub answer_category: String,

    /// Whether batch extraction runs this question
    #[serde(default = "default_included", deserialize_with = "deserialize_flag")]
    pub included: bool,
}

impl QuestionRecord {
    /// Create a new record that is included in batch extraction
    pub fn new(prompt_file: impl Into<String>, answer_category: impl Into<String>) -> Self {
        Self {
            prompt_file: prompt_file.into(),
            answer_category: answer_category.into(),
            included: true,
        }
    }

    /// Set the inclusion flag
    pub fn with_included(mut self, included: bool) -> Self {
        self.included = included;
        self
    }
}

fn default_included() -> bool {
    true
}

/// Registry files written by older tooling store the flag as "True"/"False"
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => Ok(b),
        Flag::Text(s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(true),
            "false" | "no" | "0" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "invalid inclusion flag '{}'",
                other
            ))),
        },
    }
}
