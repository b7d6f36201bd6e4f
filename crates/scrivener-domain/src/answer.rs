//! Answer categories and validated answer values

use crate::date::format_day_first;
use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::fmt;

/// Sentinel returned when an answer could not be found or validated
pub const NOT_AVAILABLE: &str = "N/A";

/// The typed shape expected of an answer
///
/// The set is closed: every category has exactly one default field name and
/// one validator, selected by exhaustive match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnswerCategory {
    /// Free text (names, titles)
    String,

    /// Whole numbers
    Integer,

    /// Decimal numbers (salaries, hours)
    Float,

    /// Calendar dates, parsed day-first
    Date,
}

impl AnswerCategory {
    /// All categories, in declaration order
    pub const ALL: [AnswerCategory; 4] = [
        AnswerCategory::String,
        AnswerCategory::Integer,
        AnswerCategory::Float,
        AnswerCategory::Date,
    ];

    /// Name of the generic schema registered for this category
    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerCategory::String => "string",
            AnswerCategory::Integer => "number",
            AnswerCategory::Float => "float",
            AnswerCategory::Date => "date",
        }
    }

    /// The semantic field a generic schema of this category populates
    pub fn default_field(&self) -> &'static str {
        match self {
            AnswerCategory::String => "name",
            AnswerCategory::Integer | AnswerCategory::Float => "number",
            AnswerCategory::Date => "date_found",
        }
    }

    /// Human readable description of the value the model must produce
    pub fn value_hint(&self) -> &'static str {
        match self {
            AnswerCategory::String => "a string",
            AnswerCategory::Integer => "an integer",
            AnswerCategory::Float => "a decimal number",
            AnswerCategory::Date => "a date in DD.MM.YYYY format",
        }
    }
}

impl fmt::Display for AnswerCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value that passed its category's validator
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerValue {
    /// Validated text
    Text(String),

    /// Validated integer
    Integer(i64),

    /// Validated float
    Float(f64),

    /// Validated calendar date
    Date(NaiveDate),
}

impl AnswerValue {
    /// Numeric view of the value, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AnswerValue::Integer(n) => Some(*n as f64),
            AnswerValue::Float(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Text(s) => f.write_str(s),
            AnswerValue::Integer(n) => write!(f, "{}", n),
            AnswerValue::Float(n) => write!(f, "{}", n),
            AnswerValue::Date(d) => f.write_str(&format_day_first(*d)),
        }
    }
}

impl Serialize for AnswerValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AnswerValue::Text(s) => serializer.serialize_str(s),
            AnswerValue::Integer(n) => serializer.serialize_i64(*n),
            AnswerValue::Float(n) => serializer.serialize_f64(*n),
            AnswerValue::Date(d) => serializer.serialize_str(&format_day_first(*d)),
        }
    }
}

/// The outcome of asking one question
///
/// `NotAvailable` is distinct from a found empty string.
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    /// A validated value
    Found(AnswerValue),

    /// The model output was unusable for this question
    NotAvailable,
}

impl Answer {
    /// Whether this is the `N/A` sentinel
    pub fn is_not_available(&self) -> bool {
        matches!(self, Answer::NotAvailable)
    }

    /// The validated value, if any
    pub fn value(&self) -> Option<&AnswerValue> {
        match self {
            Answer::Found(value) => Some(value),
            Answer::NotAvailable => None,
        }
    }
}

impl From<AnswerValue> for Answer {
    fn from(value: AnswerValue) -> Self {
        Answer::Found(value)
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Found(value) => value.fmt(f),
            Answer::NotAvailable => f.write_str(NOT_AVAILABLE),
        }
    }
}

impl Serialize for Answer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Answer::Found(value) => value.serialize(serializer),
            Answer::NotAvailable => serializer.serialize_str(NOT_AVAILABLE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_names() {
        let names: Vec<&str> = AnswerCategory::ALL.iter().map(|c| c.as_str()).collect();
        assert_eq!(names, vec!["string", "number", "float", "date"]);
        assert_eq!(AnswerCategory::Integer.to_string(), "number");
    }

    #[test]
    fn test_default_fields() {
        assert_eq!(AnswerCategory::String.default_field(), "name");
        assert_eq!(AnswerCategory::Integer.default_field(), "number");
        assert_eq!(AnswerCategory::Float.default_field(), "number");
        assert_eq!(AnswerCategory::Date.default_field(), "date_found");
    }

    #[test]
    fn test_answer_serialization() {
        let date = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        let found = Answer::Found(AnswerValue::Date(date));
        assert_eq!(serde_json::to_string(&found).unwrap(), r#""31.12.2023""#);

        let number = Answer::Found(AnswerValue::Integer(40));
        assert_eq!(serde_json::to_string(&number).unwrap(), "40");

        let missing = Answer::NotAvailable;
        assert_eq!(serde_json::to_string(&missing).unwrap(), r#""N/A""#);
    }

    #[test]
    fn test_empty_text_is_not_the_sentinel() {
        let empty = Answer::Found(AnswerValue::Text(String::new()));
        assert!(!empty.is_not_available());
        assert_eq!(empty.to_string(), "");
        assert_eq!(Answer::NotAvailable.to_string(), NOT_AVAILABLE);
    }

    #[test]
    fn test_numeric_view() {
        assert_eq!(AnswerValue::Float(1.5).as_f64(), Some(1.5));
        assert_eq!(AnswerValue::Integer(3).as_f64(), Some(3.0));
        assert_eq!(AnswerValue::Text("x".into()).as_f64(), None);
    }
}
