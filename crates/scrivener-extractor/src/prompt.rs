//! Prompt rendering
//!
//! Templates are hand-authored text files with `{name}` placeholders.
//! Substitution is best effort: placeholders without a value are left in
//! place, and values without a placeholder are ignored. Rendering happens in
//! two passes; the contract body is bound last via [`bind_contract`].

use crate::schema::AnswerSchema;

/// Placeholder for the contract body
pub const CONTRACT_PLACEHOLDER: &str = "{contract}";

/// Builds a prompt from a template and question metadata
#[derive(Debug, Clone)]
pub struct PromptBuilder<'t> {
    template: &'t str,
    values: Vec<(&'static str, String)>,
}

impl<'t> PromptBuilder<'t> {
    /// Start from a template
    pub fn new(template: &'t str) -> Self {
        Self {
            template,
            values: Vec::new(),
        }
    }

    /// Fill `{question}`
    pub fn question(self, question: impl Into<String>) -> Self {
        self.with("question", question)
    }

    /// Fill `{category}`
    pub fn category(self, category: impl Into<String>) -> Self {
        self.with("category", category)
    }

    /// Fill `{field}`
    pub fn field(self, field: impl Into<String>) -> Self {
        self.with("field", field)
    }

    /// Fill `{expected_format}`
    pub fn expected_format(self, expected_format: impl Into<String>) -> Self {
        self.with("expected_format", expected_format)
    }

    /// Fill `{format_instructions}` with the JSON shape required by `schema`
    pub fn format_instructions(self, field: &str, schema: &AnswerSchema) -> Self {
        let instructions = format_instructions(field, schema);
        self.with("format_instructions", instructions)
    }

    fn with(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.values.push((key, value.into()));
        self
    }

    /// Substitute every supplied value
    pub fn build(&self) -> String {
        self.values
            .iter()
            .fold(self.template.to_string(), |prompt, (key, value)| {
                prompt.replace(&format!("{{{}}}", key), value)
            })
    }
}

/// Fill question metadata into a template
///
/// # Examples
///
/// ```
/// use scrivener_extractor::render;
///
/// let prompt = render("Q: {question} ({category}) {contract}", "Who?", "string", "");
/// assert_eq!(prompt, "Q: Who? (string) {contract}");
/// ```
pub fn render(template: &str, question: &str, category: &str, expected_format: &str) -> String {
    PromptBuilder::new(template)
        .question(question)
        .category(category)
        .expected_format(expected_format)
        .build()
}

/// Substitute the contract body into a rendered prompt
pub fn bind_contract(prompt: &str, contract: &str) -> String {
    prompt.replace(CONTRACT_PLACEHOLDER, contract)
}

/// Describe the JSON object the model must return
pub fn format_instructions(field: &str, schema: &AnswerSchema) -> String {
    let description = schema
        .fields
        .iter()
        .find(|f| f.name == field)
        .map(|f| f.description.as_str())
        .unwrap_or("");

    format!(
        "Return only a JSON object with exactly one key, \"{field}\", holding {hint}.\n\
         {field}: {description}\n\
         Example: {{\"{field}\": \"...\"}}\n\
         If the answer is not in the contract, return {{\"{field}\": null}}.",
        field = field,
        hint = schema.category.value_hint(),
        description = description,
    )
}
