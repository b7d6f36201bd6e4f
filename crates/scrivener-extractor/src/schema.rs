//! Answer schema registry
//!
//! Maps a category name (as stored in the question registry) to the JSON
//! field the model must populate and the validator applied to it. The
//! registry is built once per process and shared read-only.

use crate::error::ExtractorError;
use scrivener_domain::{parse_day_first, AnswerCategory, AnswerValue};
use serde_json::Value;
use std::collections::BTreeMap;

/// One field of an answer schema
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// JSON key the model must emit
    pub name: String,

    /// Description shown to the model in format instructions
    pub description: String,
}

impl FieldSpec {
    /// Create a new field
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// The expected shape of one kind of answer
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerSchema {
    /// Category whose validator checks the field value
    pub category: AnswerCategory,

    /// Declared fields; a usable schema declares exactly one
    pub fields: Vec<FieldSpec>,
}

impl AnswerSchema {
    /// Schema with a single field
    pub fn single(
        category: AnswerCategory,
        field: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            category,
            fields: vec![FieldSpec::new(field, description)],
        }
    }

    /// The one field of this schema
    ///
    /// # Errors
    ///
    /// Returns `Config` if the schema declares zero or several fields.
    pub fn single_field(&self) -> Result<&FieldSpec, ExtractorError> {
        match self.fields.as_slice() {
            [field] => Ok(field),
            fields => Err(ExtractorError::Config(format!(
                "schema must declare exactly one field, found [{}]",
                fields
                    .iter()
                    .map(|f| f.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))),
        }
    }

    /// Apply this schema's validator to a field value
    pub fn validate(&self, value: &Value) -> Result<AnswerValue, String> {
        validate_value(self.category, value)
    }
}

/// Registry of named answer schemas
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    schemas: BTreeMap<String, AnswerSchema>,
}

impl SchemaRegistry {
    /// Build a registry from `(name, schema)` pairs
    pub fn new<I, S>(schemas: I) -> Self
    where
        I: IntoIterator<Item = (S, AnswerSchema)>,
        S: Into<String>,
    {
        Self {
            schemas: schemas
                .into_iter()
                .map(|(name, schema)| (name.into(), schema))
                .collect(),
        }
    }

    /// The schema registered under `category`
    ///
    /// # Errors
    ///
    /// Returns `Config` if the category is unknown.
    pub fn schema_for(&self, category: &str) -> Result<&AnswerSchema, ExtractorError> {
        self.schemas.get(category).ok_or_else(|| {
            ExtractorError::Config(format!(
                "answer category '{}' is not defined (known: {})",
                category,
                self.names().join(", ")
            ))
        })
    }

    /// The single field name the model must populate for `category`
    ///
    /// # Errors
    ///
    /// Returns `Config` if the category is unknown or its schema is ambiguous.
    pub fn field_for(&self, category: &str) -> Result<&str, ExtractorError> {
        let schema = self.schema_for(category)?;
        schema
            .single_field()
            .map(|field| field.name.as_str())
            .map_err(|e| ExtractorError::Config(format!("category '{}': {}", category, e)))
    }

    /// Registered category names, sorted
    pub fn names(&self) -> Vec<&str> {
        self.schemas.keys().map(String::as_str).collect()
    }

    /// Whether `category` is registered
    pub fn contains(&self, category: &str) -> bool {
        self.schemas.contains_key(category)
    }
}

impl Default for SchemaRegistry {
    /// Generic categories plus the contract-specific ones
    fn default() -> Self {
        let generic = AnswerCategory::ALL.into_iter().map(|category| {
            let description = match category {
                AnswerCategory::String => "The name of the found entity",
                AnswerCategory::Integer | AnswerCategory::Float => "The extracted number",
                AnswerCategory::Date => "Extracted date in DD.MM.YYYY format",
            };
            (
                category.as_str(),
                AnswerSchema::single(category, category.default_field(), description),
            )
        });

        let specific = [
            (
                "start_date",
                AnswerSchema::single(
                    AnswerCategory::Date,
                    "start_date",
                    "The start date of the employment contract in DD.MM.YYYY format",
                ),
            ),
            (
                "sign_date",
                AnswerSchema::single(
                    AnswerCategory::Date,
                    "sign_date",
                    "The sign date of the employment contract in DD.MM.YYYY format",
                ),
            ),
            (
                "employer_name",
                AnswerSchema::single(
                    AnswerCategory::String,
                    "employer_name",
                    "The name of the employer",
                ),
            ),
            (
                "employee_name",
                AnswerSchema::single(
                    AnswerCategory::String,
                    "employee_name",
                    "The name of the employee",
                ),
            ),
        ];

        Self::new(generic.chain(specific))
    }
}

/// Validate a raw field value against a category
///
/// Numbers may arrive as JSON numbers or as numeric strings.
pub fn validate_value(category: AnswerCategory, value: &Value) -> Result<AnswerValue, String> {
    match category {
        AnswerCategory::String => match value {
            Value::String(s) => Ok(AnswerValue::Text(s.clone())),
            Value::Number(n) => Ok(AnswerValue::Text(n.to_string())),
            other => Err(format!("expected a string, got {}", other)),
        },
        AnswerCategory::Integer => match value {
            Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => Ok(AnswerValue::Integer(i)),
                (None, Some(f)) if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                    Ok(AnswerValue::Integer(f as i64))
                }
                _ => Err(format!("{} is not an integer", n)),
            },
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map(AnswerValue::Integer)
                .map_err(|_| format!("'{}' is not an integer", s)),
            other => Err(format!("expected an integer, got {}", other)),
        },
        AnswerCategory::Float => {
            let parsed = match value {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            };
            match parsed {
                Some(f) if f.is_finite() => Ok(AnswerValue::Float(f)),
                _ => Err(format!("{} is not a number", value)),
            }
        }
        AnswerCategory::Date => match value {
            Value::String(s) => parse_day_first(s)
                .map(AnswerValue::Date)
                .ok_or_else(|| format!("'{}' is not a date", s)),
            other => Err(format!("expected a date string, got {}", other)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn test_default_fields() {
        let registry = SchemaRegistry::default();
        assert_eq!(registry.field_for("string").unwrap(), "name");
        assert_eq!(registry.field_for("number").unwrap(), "number");
        assert_eq!(registry.field_for("float").unwrap(), "number");
        assert_eq!(registry.field_for("date").unwrap(), "date_found");
        assert_eq!(registry.field_for("start_date").unwrap(), "start_date");
        assert_eq!(registry.field_for("employer_name").unwrap(), "employer_name");

        for category in AnswerCategory::ALL {
            let schema = registry.schema_for(category.as_str()).unwrap();
            assert_eq!(schema.category, category);
        }
    }

    #[test]
    fn test_field_for_is_stable() {
        let registry = SchemaRegistry::default();
        for name in registry.names() {
            let first = registry.field_for(name).unwrap().to_string();
            for _ in 0..3 {
                assert_eq!(registry.field_for(name).unwrap(), first);
            }
        }
    }

    #[test]
    fn test_unknown_category() {
        let registry = SchemaRegistry::default();
        assert!(matches!(registry.field_for("salary"), Err(ExtractorError::Config(_))));
        assert!(matches!(registry.schema_for("salary"), Err(ExtractorError::Config(_))));
    }

    #[test]
    fn test_ambiguous_schema_fails_at_lookup() {
        let registry = SchemaRegistry::new([(
            "period",
            AnswerSchema {
                category: AnswerCategory::Date,
                fields: vec![
                    FieldSpec::new("start_date", "start"),
                    FieldSpec::new("end_date", "end"),
                ],
            },
        )]);

        // The schema itself can still be fetched
        assert!(registry.schema_for("period").is_ok());
        assert!(matches!(registry.field_for("period"), Err(ExtractorError::Config(_))));
    }

    #[test]
    fn test_validate_integer() {
        assert_eq!(
            validate_value(AnswerCategory::Integer, &json!(40)).unwrap(),
            AnswerValue::Integer(40)
        );
        assert_eq!(
            validate_value(AnswerCategory::Integer, &json!(" 12 ")).unwrap(),
            AnswerValue::Integer(12)
        );
        assert_eq!(
            validate_value(AnswerCategory::Integer, &json!(30.0)).unwrap(),
            AnswerValue::Integer(30)
        );
        assert!(validate_value(AnswerCategory::Integer, &json!("abc")).is_err());
        assert!(validate_value(AnswerCategory::Integer, &json!(2.5)).is_err());
        assert!(validate_value(AnswerCategory::Integer, &json!(null)).is_err());
    }

    #[test]
    fn test_validate_float() {
        assert_eq!(
            validate_value(AnswerCategory::Float, &json!("3500.50")).unwrap(),
            AnswerValue::Float(3500.5)
        );
        assert_eq!(
            validate_value(AnswerCategory::Float, &json!(7)).unwrap(),
            AnswerValue::Float(7.0)
        );
        assert!(validate_value(AnswerCategory::Float, &json!("NaN")).is_err());
        assert!(validate_value(AnswerCategory::Float, &json!("lots")).is_err());
    }

    #[test]
    fn test_validate_string() {
        assert_eq!(
            validate_value(AnswerCategory::String, &json!("ACME GmbH")).unwrap(),
            AnswerValue::Text("ACME GmbH".to_string())
        );
        assert_eq!(
            validate_value(AnswerCategory::String, &json!("")).unwrap(),
            AnswerValue::Text(String::new())
        );
        assert!(validate_value(AnswerCategory::String, &json!(["a"])).is_err());
    }

    #[test]
    fn test_validate_date_day_first() {
        assert_eq!(
            validate_value(AnswerCategory::Date, &json!("01.02.2024")).unwrap(),
            AnswerValue::Date(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap())
        );
        assert!(validate_value(AnswerCategory::Date, &json!("not a date")).is_err());
        assert!(validate_value(AnswerCategory::Date, &json!(20240201)).is_err());
    }
}
