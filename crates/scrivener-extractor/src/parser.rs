//! Parse LLM output into validated answers
//!
//! Every failure here is soft: the caller gets `Answer::NotAvailable` and the
//! reason is logged at debug level.

use crate::schema::AnswerSchema;
use scrivener_domain::{Answer, AnswerValue};
use serde_json::{Map, Value};
use std::fmt;
use tracing::debug;

/// Why a raw output could not be turned into an answer
#[derive(Debug)]
enum ParseFailure {
    /// Output is not a JSON object
    Decode(String),
    /// JSON object lacks the target field
    MissingField(String),
    /// Field value rejected by the category validator
    Validation(String),
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseFailure::Decode(reason) => write!(f, "decode failed: {}", reason),
            ParseFailure::MissingField(field) => write!(f, "field '{}' missing", field),
            ParseFailure::Validation(reason) => write!(f, "validation failed: {}", reason),
        }
    }
}

/// Parse one raw model output for `field`, validated by `schema`
///
/// Returns `Answer::NotAvailable` on empty output, undecodable output, a
/// missing field or a value the validator rejects.
pub fn parse_output(raw: &str, field: &str, schema: &AnswerSchema) -> Answer {
    match try_parse(raw, field, schema) {
        Ok(value) => Answer::Found(value),
        Err(failure) => {
            debug!("Answer degraded to N/A ({})", failure);
            Answer::NotAvailable
        }
    }
}

/// Parse the outputs of several questions, each with several samples
///
/// Entries are parsed independently; one failure never affects another.
pub fn parse_responses(outputs: &[Vec<String>], field: &str, schema: &AnswerSchema) -> Vec<Vec<Answer>> {
    outputs
        .iter()
        .map(|samples| {
            samples
                .iter()
                .map(|raw| parse_output(raw, field, schema))
                .collect()
        })
        .collect()
}

fn try_parse(raw: &str, field: &str, schema: &AnswerSchema) -> Result<AnswerValue, ParseFailure> {
    let object = decode_object(raw)?;
    let value = object
        .get(field)
        .ok_or_else(|| ParseFailure::MissingField(field.to_string()))?;
    schema.validate(value).map_err(ParseFailure::Validation)
}

fn decode_object(raw: &str) -> Result<Map<String, Value>, ParseFailure> {
    let candidate = extract_json(raw);
    if candidate.is_empty() {
        return Err(ParseFailure::Decode("empty output".to_string()));
    }

    let value = match serde_json::from_str::<Value>(candidate) {
        Ok(value) => value,
        // Models often wrap the object in prose; fall back to the outermost braces
        Err(first_error) => match outermost_object(candidate) {
            Some(inner) => serde_json::from_str::<Value>(inner)
                .map_err(|e| ParseFailure::Decode(e.to_string()))?,
            None => return Err(ParseFailure::Decode(first_error.to_string())),
        },
    };

    match value {
        Value::Object(map) => Ok(map),
        other => Err(ParseFailure::Decode(format!(
            "expected a JSON object, got {}",
            kind_of(&other)
        ))),
    }
}

/// Strip a markdown code fence around the output, if any
fn extract_json(response: &str) -> &str {
    let trimmed = response.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }

    // Drop the opening fence line (```json or ```) and the closing fence
    let body = match trimmed.find('\n') {
        Some(newline) => &trimmed[newline + 1..],
        None => return "",
    };
    body.trim_end().trim_end_matches("```").trim()
}

fn outermost_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
