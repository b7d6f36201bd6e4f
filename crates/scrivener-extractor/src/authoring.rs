//! Authoring new questions
//!
//! A question is drafted from the meta template, optionally evaluated on
//! sample contracts with known answers, and only persisted once approved.

use crate::error::ExtractorError;
use crate::evaluation::{EvaluationReport, Evaluator, SampleOutcome};
use crate::extractor::Extractor;
use crate::prompt::PromptBuilder;
use crate::schema::SchemaRegistry;
use scrivener_domain::traits::{LlmProvider, TemplateSource};
use scrivener_store::{PromptStore, QuestionRegistry};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use tracing::{info, warn};

/// A question as submitted by an operator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionDraft {
    /// The question in one or two sentences
    pub question: String,

    /// Id the question is registered under
    pub name_of_entity: String,

    /// Answer category name (see [`SchemaRegistry`])
    pub category: String,

    /// Free text description of the expected answer format
    pub expected_format: String,
}

/// A drafted question whose prompt is ready to be evaluated or stored
#[derive(Debug, Clone, Serialize)]
pub struct AuthoredQuestion {
    /// Id the question will be registered under
    pub question_id: String,

    /// Answer category name
    pub category: String,

    /// Field the model must populate
    pub field: String,

    /// Rendered prompt, still holding the `{contract}` placeholder
    pub prompt: String,

    /// File name the prompt will be stored under
    pub prompt_file: String,
}

/// A sample contract for evaluating a drafted question
#[derive(Debug, Clone)]
pub struct EvaluationSample {
    /// Where the contract came from
    pub locator: String,

    /// Contract text
    pub contract: String,

    /// Known correct answer
    pub ground_truth: Option<String>,
}

/// Pair sample locators with their ground truth values
///
/// # Errors
///
/// Returns `Evaluation` when both are given but their lengths differ.
pub fn pair_ground_truth(
    locators: &[String],
    ground_truth: Option<&[String]>,
) -> Result<Vec<(String, Option<String>)>, ExtractorError> {
    match ground_truth {
        None => Ok(locators.iter().map(|l| (l.clone(), None)).collect()),
        Some(truths) if truths.len() == locators.len() => Ok(locators
            .iter()
            .cloned()
            .zip(truths.iter().cloned().map(Some))
            .collect()),
        Some(truths) => Err(ExtractorError::Evaluation(format!(
            "{} ground truth values for {} files",
            truths.len(),
            locators.len()
        ))),
    }
}

impl<L> Extractor<L>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: Display,
{
    /// Render the prompt for a new question from the meta template
    ///
    /// # Errors
    ///
    /// Returns `Config` for an unknown or ambiguous category or an unusable
    /// question id, and `Template` if the meta template cannot be loaded.
    pub fn draft_question<T>(
        &self,
        draft: &QuestionDraft,
        schemas: &SchemaRegistry,
        templates: &T,
    ) -> Result<AuthoredQuestion, ExtractorError>
    where
        T: TemplateSource,
        T::Error: Display,
    {
        let question_id = draft.name_of_entity.trim();
        if question_id.is_empty() || question_id.contains(['/', '\\']) {
            return Err(ExtractorError::Config(format!(
                "'{}' is not a usable question id",
                draft.name_of_entity
            )));
        }

        let schema = schemas.schema_for(&draft.category)?;
        let field = schemas.field_for(&draft.category)?;

        let template_file = &self.config().template_file;
        let meta = templates
            .load_template(template_file)
            .map_err(|e| ExtractorError::Template(format!("{}: {}", template_file, e)))?;

        let prompt = PromptBuilder::new(&meta)
            .question(draft.question.as_str())
            .field(field)
            .category(draft.category.as_str())
            .expected_format(draft.expected_format.as_str())
            .format_instructions(field, schema)
            .build();

        Ok(AuthoredQuestion {
            question_id: question_id.to_string(),
            category: draft.category.clone(),
            field: field.to_string(),
            prompt,
            prompt_file: PromptStore::prompt_file_name(
                &self.config().prompt_file_prefix,
                question_id,
            ),
        })
    }

    /// Run a drafted question over sample contracts and grade the answers
    pub async fn evaluate_question(
        &self,
        authored: &AuthoredQuestion,
        schemas: &SchemaRegistry,
        samples: &[EvaluationSample],
        number_tolerance: f64,
    ) -> Result<EvaluationReport, ExtractorError> {
        let schema = schemas.schema_for(&authored.category)?;
        let evaluator = Evaluator::new(self.config().string_distance_threshold)
            .with_number_tolerance(number_tolerance);

        let mut report = EvaluationReport::default();
        for sample in samples {
            let answer = self
                .execute_prompt(&authored.prompt, &sample.contract, &authored.field, schema)
                .await?;
            info!("Sample {}: extracted {}", sample.locator, answer);

            let passed = sample
                .ground_truth
                .as_deref()
                .map(|truth| evaluator.matches(truth, &answer));
            report.samples.push(SampleOutcome {
                locator: sample.locator.clone(),
                answer,
                ground_truth: sample.ground_truth.clone(),
                passed,
            });
        }

        if let Some(accuracy) = report.accuracy() {
            info!("Evaluation accuracy for '{}': {:.1}%", authored.question_id, accuracy);
        }
        Ok(report)
    }
}

/// Store an approved question's prompt and register it
///
/// If the registry cannot be updated the prompt folder is restored: a new
/// prompt file is deleted, an overwritten one gets its old contents back.
pub fn include_new_question(
    authored: &AuthoredQuestion,
    prompts: &PromptStore,
    registry: &QuestionRegistry,
) -> Result<(), ExtractorError> {
    let previous = prompts.load(&authored.prompt_file).ok();
    let path = prompts.save(&authored.prompt_file, &authored.prompt)?;
    if let Err(e) = registry.add(
        authored.question_id.as_str(),
        authored.prompt_file.as_str(),
        authored.category.as_str(),
        true,
    ) {
        let restored = match &previous {
            Some(contents) => prompts.save(&authored.prompt_file, contents).map(|_| ()),
            None => prompts.delete(&authored.prompt_file).map(|_| ()),
        };
        if let Err(cleanup) = restored {
            warn!(
                "Could not restore prompt {} after failed registration: {}",
                path.display(),
                cleanup
            );
        }
        return Err(e.into());
    }
    info!(
        "Added question '{}' with prompt {}",
        authored.question_id,
        path.display()
    );
    Ok(())
}
