//! HTTP request handlers for the Router service.
//!
//! Exposes the extraction pipeline and question administration over JSON
//! using axum.

use crate::webhook::WebhookClient;
use crate::RouterError;
use axum::{
    extract::{Request, State},
    http::{HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use scrivener_domain::Answer;
use scrivener_extractor::{
    include_new_question, pair_ground_truth, EvaluationReport, EvaluationSample,
    ExtractionContext, Extractor, ExtractorError, QuestionDraft, SchemaRegistry,
};
use scrivener_llm::ConfiguredProvider;
use scrivener_reader::{FileReader, ReaderError};
use scrivener_store::{PromptStore, QuestionRegistry, StoreError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Persisted questions
    pub registry: Arc<QuestionRegistry>,
    /// Answer schemas by category name
    pub schemas: Arc<SchemaRegistry>,
    /// Prompt template folder
    pub prompts: Arc<PromptStore>,
    /// Extraction pipeline
    pub extractor: Arc<Extractor<ConfiguredProvider>>,
    /// Contract reader
    pub reader: Arc<FileReader>,
    /// Optional receiver of batch results
    pub webhook: Option<Arc<WebhookClient>>,
}

impl AppState {
    fn context(&self) -> ExtractionContext<'_, PromptStore> {
        ExtractionContext::new(&self.registry, &self.schemas, &self.prompts)
    }

    async fn read_contract(&self, locator: &str) -> Result<String, AppError> {
        let raw = self.reader.read(locator).await?;
        Ok(self.extractor.prepare_contract(&raw))
    }
}

/// Single question request
#[derive(Debug, Deserialize)]
pub struct AskQuestionRequest {
    /// Contract path or URL
    pub file_url: String,
    /// Question id
    pub questionid: String,
}

/// Single question response
#[derive(Debug, Serialize, Deserialize)]
pub struct AskQuestionResponse {
    /// Question id
    pub questionid: String,
    /// Validated value or "N/A"
    pub answer: serde_json::Value,
}

/// Batch request
#[derive(Debug, Deserialize)]
pub struct ProcessContractRequest {
    /// Contract path or URL
    pub file_url: String,
}

/// Request to author a new question
#[derive(Debug, Deserialize)]
pub struct AddQuestionRequest {
    /// The question in one or two sentences
    pub question: String,
    /// Id the question is registered under
    pub name_of_entity: String,
    /// Answer category name
    #[serde(alias = "category")]
    pub pydantic_category: String,
    /// Description of the expected answer format
    pub expected_format: String,
    /// Sample contracts to evaluate the prompt on
    #[serde(default)]
    pub file_urls: Option<Vec<String>>,
    /// Known answers, one per sample contract
    #[serde(default)]
    pub ground_truth: Option<Vec<String>>,
    /// Accepted absolute difference for numeric answers
    #[serde(default)]
    pub tolerated_difference_in_number_output: f64,
    /// Persist the question (otherwise only draft and evaluate)
    #[serde(default)]
    pub include: bool,
}

/// Outcome of an add-question request
#[derive(Debug, Serialize, Deserialize)]
pub struct AddQuestionResponse {
    /// Question id
    pub question_id: String,
    /// Whether the question was persisted
    pub added: bool,
    /// Rendered prompt
    pub prompt: String,
    /// Per-sample evaluation, if samples were given
    pub evaluation: Option<serde_json::Value>,
    /// Percentage of graded samples that passed
    pub accuracy: Option<f64>,
}

/// Request to remove a question
#[derive(Debug, Deserialize)]
pub struct RemoveQuestionRequest {
    /// Question id
    pub name_of_entity: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
    /// Number of registered questions
    pub question_count: usize,
    /// Model answering questions
    pub model: String,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Extraction pipeline error
    Extractor(ExtractorError),
    /// Contract ingestion error
    Reader(ReaderError),
    /// Registry or prompt folder error
    Store(StoreError),
    /// Malformed request
    BadRequest(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Extractor(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            AppError::Extractor(ExtractorError::Llm(_)) => StatusCode::BAD_GATEWAY,
            AppError::Extractor(ExtractorError::TextTooLong(_, _))
            | AppError::Extractor(ExtractorError::Evaluation(_)) => StatusCode::BAD_REQUEST,
            AppError::Extractor(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Reader(ReaderError::UnsupportedFormat(_))
            | AppError::Reader(ReaderError::RotationUnsupported { .. })
            | AppError::Reader(ReaderError::Encoding(_))
            | AppError::Reader(ReaderError::Pdf(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Reader(ReaderError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                StatusCode::NOT_FOUND
            }
            AppError::Reader(ReaderError::LocalPathRejected(_)) => StatusCode::BAD_REQUEST,
            AppError::Reader(ReaderError::TooLarge { .. }) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Reader(ReaderError::Download(_)) => StatusCode::BAD_GATEWAY,
            AppError::Reader(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Store(StoreError::InvalidData(_)) => StatusCode::BAD_REQUEST,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::Extractor(e) => e.to_string(),
            AppError::Reader(e) => e.to_string(),
            AppError::Store(e) => e.to_string(),
            AppError::BadRequest(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();
        if status.is_server_error() {
            warn!("Request failed ({}): {}", status, message);
        } else {
            info!("Request rejected ({}): {}", status, message);
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

impl From<ExtractorError> for AppError {
    fn from(e: ExtractorError) -> Self {
        AppError::Extractor(e)
    }
}

impl From<ReaderError> for AppError {
    fn from(e: ReaderError) -> Self {
        AppError::Reader(e)
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Store(e)
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<serde_json::Value, AppError> {
    serde_json::to_value(value)
        .map_err(|e| AppError::Extractor(ExtractorError::Config(format!("serialization: {}", e))))
}

/// POST /v1/ask_single_question - Answer one question about one contract
async fn ask_single_question(
    State(state): State<AppState>,
    Json(request): Json<AskQuestionRequest>,
) -> Result<Json<AskQuestionResponse>, AppError> {
    // Fail on unknown ids before touching the contract
    if !state.registry.contains(&request.questionid) {
        return Err(ExtractorError::QuestionNotFound(request.questionid).into());
    }

    let contract = state.read_contract(&request.file_url).await?;
    let answer: Answer = state
        .extractor
        .answer_one(&contract, &request.questionid, &state.context())
        .await?;

    Ok(Json(AskQuestionResponse {
        questionid: request.questionid,
        answer: to_json(&answer)?,
    }))
}

/// POST /v1/process_contract - Answer every included question
async fn process_contract(
    State(state): State<AppState>,
    Json(request): Json<ProcessContractRequest>,
) -> Result<Json<BTreeMap<String, Answer>>, AppError> {
    let contract = state.read_contract(&request.file_url).await?;
    let result = state.extractor.answer_all(&contract, &state.context()).await?;

    if let Some(webhook) = &state.webhook {
        webhook.deliver(&result.answers).await;
    }
    Ok(Json(result.answers))
}

/// POST /v1/add_question - Draft, evaluate and optionally persist a question
async fn add_question(
    State(state): State<AppState>,
    Json(request): Json<AddQuestionRequest>,
) -> Result<Json<AddQuestionResponse>, AppError> {
    if request.ground_truth.is_some() && request.file_urls.is_none() {
        return Err(AppError::BadRequest(
            "ground_truth requires file_urls".to_string(),
        ));
    }

    let draft = QuestionDraft {
        question: request.question,
        name_of_entity: request.name_of_entity,
        category: request.pydantic_category,
        expected_format: request.expected_format,
    };
    let authored = state
        .extractor
        .draft_question(&draft, &state.schemas, state.prompts.as_ref())?;

    let mut report: Option<EvaluationReport> = None;
    if let Some(file_urls) = &request.file_urls {
        let pairs = pair_ground_truth(file_urls, request.ground_truth.as_deref())?;
        let mut samples = Vec::with_capacity(pairs.len());
        for (locator, ground_truth) in pairs {
            let contract = state.read_contract(&locator).await?;
            samples.push(EvaluationSample {
                locator,
                contract,
                ground_truth,
            });
        }
        report = Some(
            state
                .extractor
                .evaluate_question(
                    &authored,
                    &state.schemas,
                    &samples,
                    request.tolerated_difference_in_number_output,
                )
                .await?,
        );
    }

    if request.include {
        include_new_question(&authored, &state.prompts, &state.registry)?;
    } else {
        info!("Question '{}' drafted but not added", authored.question_id);
    }

    Ok(Json(AddQuestionResponse {
        question_id: authored.question_id,
        added: request.include,
        prompt: authored.prompt,
        accuracy: report.as_ref().and_then(EvaluationReport::accuracy),
        evaluation: report.as_ref().map(to_json).transpose()?,
    }))
}

/// POST /v1/remove_question - Remove a question from the registry
async fn remove_question(
    State(state): State<AppState>,
    Json(request): Json<RemoveQuestionRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.registry.remove(&request.name_of_entity)?;
    Ok(Json(serde_json::json!({ "removed": request.name_of_entity })))
}

/// GET /v1/list_all_questions - Ids of every registered question
async fn list_all_questions(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.registry.list_all().into_keys().collect())
}

/// GET /health - Liveness and basic configuration
async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        question_count: state.registry.len(),
        model: state.extractor.model_name().to_string(),
    })
}

/// Tag every request with a time-ordered id, in logs and in `x-request-id`
async fn request_id(request: Request, next: Next) -> Response {
    let id = Uuid::now_v7();
    let span = info_span!(
        "request",
        request_id = %id,
        method = %request.method(),
        path = %request.uri().path()
    );

    let mut response = next.run(request).instrument(span).await;
    if let Ok(value) = HeaderValue::from_str(&id.to_string()) {
        response.headers_mut().insert("x-request-id", value);
    }
    response
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    AxumRouter::new()
        .route("/health", get(health_check))
        .route("/v1/ask_single_question", post(ask_single_question))
        .route("/v1/process_contract", post(process_contract))
        .route("/v1/add_question", post(add_question))
        .route("/v1/remove_question", post(remove_question))
        .route("/v1/list_all_questions", get(list_all_questions))
        .layer(middleware::from_fn(request_id))
        .with_state(state)
}

/// Build the application state from configuration
pub fn build_state(config: &crate::config::RouterConfig) -> Result<AppState, RouterError> {
    let registry = QuestionRegistry::open(&config.extractor.registry_file)?;
    let prompts = PromptStore::new(&config.extractor.prompt_folder);
    let provider = config.llm.build()?;
    let extractor = Extractor::new(provider, config.extractor.clone());
    let webhook = config.webhook_url.as_ref().map(|url| {
        Arc::new(WebhookClient::new(
            url.as_str(),
            std::time::Duration::from_secs(config.webhook_timeout_secs),
        ))
    });

    Ok(AppState {
        registry: Arc::new(registry),
        schemas: Arc::new(SchemaRegistry::default()),
        prompts: Arc::new(prompts),
        extractor: Arc::new(extractor),
        reader: Arc::new(
            FileReader::new()
                .with_local_files(config.allow_local_files)
                .with_max_download_bytes(config.max_download_bytes),
        ),
        webhook,
    })
}
