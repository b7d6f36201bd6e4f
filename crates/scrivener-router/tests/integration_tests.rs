//! Integration tests for the Router service

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use scrivener_extractor::{Extractor, ExtractorConfig, SchemaRegistry};
use scrivener_llm::{ConfiguredProvider, MockProvider};
use scrivener_reader::FileReader;
use scrivener_router::handlers::{
    create_router, AddQuestionResponse, AppState, AskQuestionResponse, ErrorResponse,
    HealthCheckResponse,
};
use scrivener_store::{PromptStore, QuestionRegistry};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt; // for oneshot

const CONTRACT: &str = "Arbeitsvertrag zwischen ACME GmbH und Jane Doe.\n\nBeginn:   01.04.2023";

const META_TEMPLATE: &str = "Answer the question: {question}\n\
Return JSON with the key {field}. {format_instructions}\n\
Expected format: {expected_format}\n\nContract: {contract}";

struct TestApp {
    dir: TempDir,
    state: AppState,
    llm: MockProvider,
}

impl TestApp {
    /// Contracts are written to the temp dir, so local paths are enabled here
    fn new(llm: MockProvider) -> Self {
        Self::with_reader(llm, FileReader::new().with_local_files(true))
    }

    fn with_reader(llm: MockProvider, reader: FileReader) -> Self {
        let dir = TempDir::new().unwrap();
        let registry = QuestionRegistry::open_or_create(dir.path().join("questions.json")).unwrap();
        let prompts = PromptStore::new(dir.path().join("prompts"));
        prompts.save("template_prompt.txt", META_TEMPLATE).unwrap();

        let extractor = Extractor::new(
            ConfiguredProvider::Mock(llm.clone()),
            ExtractorConfig::default(),
        );

        let state = AppState {
            registry: Arc::new(registry),
            schemas: Arc::new(SchemaRegistry::default()),
            prompts: Arc::new(prompts),
            extractor: Arc::new(extractor),
            reader: Arc::new(reader),
            webhook: None,
        };
        Self { dir, state, llm }
    }

    fn question(&self, id: &str, category: &str, included: bool) {
        let file = format!("question_{}.txt", id);
        self.state
            .prompts
            .save(&file, &format!("Question {}. Contract: {{contract}}", id))
            .unwrap();
        self.state.registry.add(id, file, category, included).unwrap();
    }

    fn contract(&self) -> String {
        let path = self.dir.path().join("contract.txt");
        std::fs::write(&path, CONTRACT).unwrap();
        path.to_str().unwrap().to_string()
    }

    fn router(&self) -> Router {
        create_router(self.state.clone())
    }
}

async fn post(app: Router, uri: &str, body: Value) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

#[tokio::test]
async fn test_health_check_endpoint() {
    let app = TestApp::new(MockProvider::default());
    app.question("employer", "employer_name", true);

    let (status, body) = get(app.router(), "/health").await;
    assert_eq!(status, StatusCode::OK);

    let health: HealthCheckResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.question_count, 1);
    assert_eq!(health.model, "mock");
}

#[tokio::test]
async fn test_ask_single_question_returns_typed_date() {
    let llm = MockProvider::default().with_response("Question start", r#"{"start_date": "01.04.2023"}"#);
    let app = TestApp::new(llm);
    app.question("start", "start_date", true);

    let (status, body) = post(
        app.router(),
        "/v1/ask_single_question",
        serde_json::json!({ "file_url": app.contract(), "questionid": "start" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let response: AskQuestionResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(response.questionid, "start");
    assert_eq!(response.answer, Value::String("01.04.2023".to_string()));

    // The contract reaches the model preprocessed
    let prompts = app.llm.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Beginn: 01.04.2023"));
}

#[tokio::test]
async fn test_ask_unknown_question_is_not_found() {
    let app = TestApp::new(MockProvider::default());

    let (status, body) = post(
        app.router(),
        "/v1/ask_single_question",
        serde_json::json!({ "file_url": app.contract(), "questionid": "missing" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert!(error.error.contains("missing"));
    assert_eq!(app.llm.call_count(), 0);
}

#[tokio::test]
async fn test_process_contract_answers_included_questions() {
    let llm = MockProvider::default()
        .with_response("Question employer", r#"{"employer_name": "ACME GmbH"}"#)
        .with_response("Question hours", "no idea");
    let app = TestApp::new(llm);
    app.question("employer", "employer_name", true);
    app.question("hours", "number", true);
    app.question("salary", "float", false);

    let (status, body) = post(
        app.router(),
        "/v1/process_contract",
        serde_json::json!({ "file_url": app.contract() }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let answers: BTreeMap<String, Value> = serde_json::from_slice(&body).unwrap();
    assert_eq!(answers.len(), 2);
    assert_eq!(answers["employer"], "ACME GmbH");
    assert_eq!(answers["hours"], "N/A");
    assert!(!answers.contains_key("salary"));
}

#[tokio::test]
async fn test_process_contract_llm_failure_is_bad_gateway() {
    let llm = MockProvider::default();
    llm.add_error("Question employer");
    let app = TestApp::new(llm);
    app.question("employer", "employer_name", true);

    let (status, _) = post(
        app.router(),
        "/v1/process_contract",
        serde_json::json!({ "file_url": app.contract() }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_unsupported_contract_format() {
    let app = TestApp::new(MockProvider::default());
    app.question("employer", "employer_name", true);
    let scan = app.dir.path().join("scan.png");
    std::fs::write(&scan, [0x89, b'P', b'N', b'G']).unwrap();

    let (status, _) = post(
        app.router(),
        "/v1/process_contract",
        serde_json::json!({ "file_url": scan.to_str().unwrap() }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(app.llm.call_count(), 0);
}

#[tokio::test]
async fn test_local_contract_rejected_when_local_files_disabled() {
    let llm = MockProvider::default();
    let app = TestApp::with_reader(llm.clone(), FileReader::new().with_local_files(false));
    app.question("employer", "employer_name", true);

    let (status, body) = post(
        app.router(),
        "/v1/ask_single_question",
        serde_json::json!({"file_url": app.contract(), "questionid": "employer"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert!(error.error.contains("Local files are not allowed"));

    let (status, _) = post(
        app.router(),
        "/v1/process_contract",
        serde_json::json!({"file_url": "/etc/passwd"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn test_add_question_with_evaluation_and_include() {
    let llm = MockProvider::default().with_response("Answer the question", r#"{"employer_name": "ACME GmbH"}"#);
    let app = TestApp::new(llm);
    let contract = app.contract();

    let (status, body) = post(
        app.router(),
        "/v1/add_question",
        serde_json::json!({
            "question": "Who is the employer?",
            "name_of_entity": "employer",
            "pydantic_category": "employer_name",
            "expected_format": "the company name",
            "file_urls": [contract],
            "ground_truth": ["acme gmbh"],
            "include": true
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let response: AddQuestionResponse = serde_json::from_slice(&body).unwrap();
    assert!(response.added);
    assert_eq!(response.accuracy, Some(100.0));
    assert!(response.prompt.contains("Who is the employer?"));
    assert!(response.prompt.contains("{contract}"));

    let record = app.state.registry.get("employer").unwrap();
    assert_eq!(record.prompt_file, "question_employer.txt");
    assert!(record.included);
    assert!(app.state.prompts.load("question_employer.txt").is_ok());
}

#[tokio::test]
async fn test_add_question_without_include_is_not_persisted() {
    let app = TestApp::new(MockProvider::default());

    let (status, body) = post(
        app.router(),
        "/v1/add_question",
        serde_json::json!({
            "question": "When does employment start?",
            "name_of_entity": "start",
            "pydantic_category": "start_date",
            "expected_format": "DD.MM.YYYY"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let response: AddQuestionResponse = serde_json::from_slice(&body).unwrap();
    assert!(!response.added);
    assert!(response.evaluation.is_none());
    assert!(!app.state.registry.contains("start"));
}

#[tokio::test]
async fn test_add_question_mismatched_ground_truth() {
    let app = TestApp::new(MockProvider::default());
    let contract = app.contract();

    let (status, _) = post(
        app.router(),
        "/v1/add_question",
        serde_json::json!({
            "question": "Who is the employer?",
            "name_of_entity": "employer",
            "pydantic_category": "employer_name",
            "expected_format": "the company name",
            "file_urls": [contract],
            "ground_truth": ["ACME", "Initech"]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_add_question_unknown_category() {
    let app = TestApp::new(MockProvider::default());

    let (status, _) = post(
        app.router(),
        "/v1/add_question",
        serde_json::json!({
            "question": "What colour is the contract?",
            "name_of_entity": "colour",
            "pydantic_category": "colour",
            "expected_format": "a colour"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_remove_and_list_questions() {
    let app = TestApp::new(MockProvider::default());
    app.question("employer", "employer_name", true);
    app.question("start", "start_date", false);

    let (status, body) = get(app.router(), "/v1/list_all_questions").await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<String> = serde_json::from_slice(&body).unwrap();
    assert_eq!(ids, vec!["employer", "start"]);

    let (status, _) = post(
        app.router(),
        "/v1/remove_question",
        serde_json::json!({ "name_of_entity": "start" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = post(
        app.router(),
        "/v1/remove_question",
        serde_json::json!({ "name_of_entity": "start" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = get(app.router(), "/v1/list_all_questions").await;
    let ids: Vec<String> = serde_json::from_slice(&body).unwrap();
    assert_eq!(ids, vec!["employer"]);
}
