//! Core Extractor implementation

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::parser::parse_output;
use crate::preprocess::preprocess;
use crate::prompt::bind_contract;
use crate::schema::{AnswerSchema, SchemaRegistry};
use crate::types::{ExtractionMetadata, ExtractionResult};
use chrono::Utc;
use scrivener_domain::traits::{LlmProvider, TemplateSource};
use scrivener_domain::{Answer, QuestionRecord};
use scrivener_store::QuestionRegistry;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Everything an extraction reads besides the contract
///
/// Passed explicitly so tests can build isolated registries and template
/// folders.
pub struct ExtractionContext<'a, T: TemplateSource> {
    /// Persisted questions
    pub registry: &'a QuestionRegistry,

    /// Answer schemas by category name
    pub schemas: &'a SchemaRegistry,

    /// Prompt templates by file name
    pub templates: &'a T,
}

impl<'a, T: TemplateSource> ExtractionContext<'a, T> {
    /// Bundle the three read-only collaborators
    pub fn new(registry: &'a QuestionRegistry, schemas: &'a SchemaRegistry, templates: &'a T) -> Self {
        Self {
            registry,
            schemas,
            templates,
        }
    }
}

/// Answers persisted questions about contract text with an LLM
///
/// Questions are processed one after another. Unusable model output becomes
/// `N/A`; a failing completion call fails the whole request and is never
/// retried here.
pub struct Extractor<L>
where
    L: LlmProvider,
{
    llm_provider: Arc<L>,
    config: ExtractorConfig,
    model_name: String,
}

impl<L> Extractor<L>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: Display,
{
    /// Create a new Extractor
    pub fn new(llm_provider: L, config: ExtractorConfig) -> Self {
        let model_name = llm_provider.model_name().to_string();
        Self {
            llm_provider: Arc::new(llm_provider),
            config,
            model_name,
        }
    }

    /// Create a new Extractor with a specific model name
    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    /// Active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Name of the model answers come from
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Normalise raw contract text if preprocessing is enabled
    pub fn prepare_contract(&self, raw: &str) -> String {
        if self.config.preprocess {
            preprocess(raw)
        } else {
            raw.to_string()
        }
    }

    /// Answer a single question
    ///
    /// # Errors
    ///
    /// - `QuestionNotFound` if the id is not registered; no completion call is made
    /// - `Config` if the question's category is unknown or ambiguous
    /// - `Template` if its prompt file cannot be loaded
    /// - `Llm` if the completion call fails
    pub async fn answer_one<T>(
        &self,
        contract: &str,
        question_id: &str,
        ctx: &ExtractionContext<'_, T>,
    ) -> Result<Answer, ExtractorError>
    where
        T: TemplateSource,
        T::Error: Display,
    {
        let record = ctx
            .registry
            .get(question_id)
            .ok_or_else(|| ExtractorError::QuestionNotFound(question_id.to_string()))?;

        self.check_length(contract)?;
        self.answer_record(contract, question_id, &record, ctx).await
    }

    /// Answer every included question
    ///
    /// Excluded questions produce no entry. Parse failures degrade to `N/A`
    /// without affecting other questions.
    pub async fn answer_all<T>(
        &self,
        contract: &str,
        ctx: &ExtractionContext<'_, T>,
    ) -> Result<ExtractionResult, ExtractorError>
    where
        T: TemplateSource,
        T::Error: Display,
    {
        let start_time = Instant::now();
        let contract_length = self.check_length(contract)?;

        let questions = ctx.registry.included();
        info!(
            "Answering {} included questions, contract length {}",
            questions.len(),
            contract_length
        );

        let mut answers = BTreeMap::new();
        for (question_id, record) in &questions {
            let answer = self.answer_record(contract, question_id, record, ctx).await?;
            answers.insert(question_id.clone(), answer);
        }

        let metadata = ExtractionMetadata {
            timestamp: Utc::now(),
            model_name: self.model_name.clone(),
            questions_asked: questions.len(),
            contract_length,
            processing_time_ms: start_time.elapsed().as_millis() as u64,
        };

        let result = ExtractionResult { answers, metadata };
        info!(
            "Extraction complete: {} answers, {} N/A, {} ms",
            result.answers.len(),
            result.not_available_count(),
            result.metadata.processing_time_ms
        );
        Ok(result)
    }

    /// Bind `contract` into an already rendered prompt, complete and parse it
    pub async fn execute_prompt(
        &self,
        prompt: &str,
        contract: &str,
        field: &str,
        schema: &AnswerSchema,
    ) -> Result<Answer, ExtractorError> {
        let prompt = bind_contract(prompt, contract);
        debug!("Prompt length: {} chars", prompt.len());

        let raw = self.call_llm(&prompt).await?;
        debug!("LLM response length: {} chars", raw.len());

        Ok(parse_output(&raw, field, schema))
    }

    async fn answer_record<T>(
        &self,
        contract: &str,
        question_id: &str,
        record: &QuestionRecord,
        ctx: &ExtractionContext<'_, T>,
    ) -> Result<Answer, ExtractorError>
    where
        T: TemplateSource,
        T::Error: Display,
    {
        let schema = ctx.schemas.schema_for(&record.answer_category)?;
        let field = ctx.schemas.field_for(&record.answer_category)?;
        let template = ctx
            .templates
            .load_template(&record.prompt_file)
            .map_err(|e| ExtractorError::Template(format!("{}: {}", record.prompt_file, e)))?;

        let answer = self.execute_prompt(&template, contract, field, schema).await?;
        if answer.is_not_available() {
            warn!("Question '{}' answered N/A", question_id);
        } else {
            info!("Question '{}' answered", question_id);
        }
        Ok(answer)
    }

    /// Length in characters, rejected above `max_contract_length`
    fn check_length(&self, contract: &str) -> Result<usize, ExtractorError> {
        let length = contract.chars().count();
        if length > self.config.max_contract_length {
            return Err(ExtractorError::TextTooLong(length, self.config.max_contract_length));
        }
        Ok(length)
    }

    /// Call the LLM provider
    async fn call_llm(&self, prompt: &str) -> Result<String, ExtractorError> {
        let llm = Arc::clone(&self.llm_provider);
        let prompt = prompt.to_string();

        // Call in a blocking context since LlmProvider is not async
        tokio::task::spawn_blocking(move || {
            llm.generate(&prompt)
                .map_err(|e| ExtractorError::Llm(e.to_string()))
        })
        .await
        .map_err(|e| ExtractorError::Llm(format!("Task join error: {}", e)))?
    }
}
