//! Integration tests for the CLI commands against a temporary workspace

use scrivener_cli::cli::{AddQuestionArgs, AskArgs, ProcessArgs, RemoveQuestionArgs};
use scrivener_cli::commands::{self, add::add_question, remove::remove_question};
use scrivener_cli::config::OutputFormat;
use scrivener_cli::{CliError, Config, Formatter, Session};
use scrivener_domain::{Answer, AnswerValue};
use scrivener_llm::{ConfiguredProvider, MockProvider};
use std::io::Cursor;
use tempfile::TempDir;

const TEMPLATE: &str = "Answer the question: {question}\n\
Return JSON with the key {field}. {format_instructions}\n\
Expected format: {expected_format}\n\nContract: {contract}";

struct Workspace {
    dir: TempDir,
    config: Config,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.extractor.registry_file = dir.path().join("question_id_list.json");
        config.extractor.prompt_folder = dir.path().join("prompts");

        std::fs::create_dir_all(&config.extractor.prompt_folder).unwrap();
        std::fs::write(config.extractor.prompt_folder.join("template_prompt.txt"), TEMPLATE).unwrap();
        Self { dir, config }
    }

    fn session(&self, llm: &MockProvider) -> Session {
        Session::with_provider(&self.config, ConfiguredProvider::Mock(llm.clone())).unwrap()
    }

    fn contract(&self, name: &str, text: &str) -> String {
        let path = self.dir.path().join(name);
        std::fs::write(&path, text).unwrap();
        path.to_str().unwrap().to_string()
    }
}

fn formatter() -> Formatter {
    Formatter::new(OutputFormat::Json, false)
}

fn add_args(name: &str, category: &str) -> AddQuestionArgs {
    AddQuestionArgs {
        question: format!("What is the {}?", name),
        name: name.to_string(),
        category: category.to_string(),
        expected_format: String::new(),
        files: Vec::new(),
        ground_truth: Vec::new(),
        tolerance: 0.0,
        yes: true,
    }
}

#[tokio::test]
async fn test_add_then_ask() {
    let workspace = Workspace::new();
    let llm = MockProvider::new(r#"{"start_date": "01.04.2023"}"#);
    let session = workspace.session(&llm);

    let added = add_question(add_args("start", "start_date"), &session, &formatter(), &mut Cursor::new(""))
        .await
        .unwrap();
    assert!(added);
    assert!(workspace.config.extractor.prompt_folder.join("question_start.txt").exists());

    let file = workspace.contract("contract.txt", "Beginn des Arbeitsverhaeltnisses: 01.04.2023");
    let answer = commands::execute_ask(
        AskArgs {
            file,
            question_id: "start".to_string(),
        },
        &session,
        &formatter(),
    )
    .await
    .unwrap();

    let expected = chrono_date(2023, 4, 1);
    assert_eq!(answer, Answer::Found(AnswerValue::Date(expected)));
}

fn chrono_date(y: i32, m: u32, d: u32) -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn test_add_declined_is_not_persisted() {
    let workspace = Workspace::new();
    let llm = MockProvider::default();
    let session = workspace.session(&llm);

    let mut args = add_args("employer", "employer_name");
    args.yes = false;
    let added = add_question(args, &session, &formatter(), &mut Cursor::new("n\n"))
        .await
        .unwrap();

    assert!(!added);
    assert!(!session.registry.contains("employer"));
}

#[tokio::test]
async fn test_add_with_mismatched_truth_is_rejected() {
    let workspace = Workspace::new();
    let llm = MockProvider::default();
    let session = workspace.session(&llm);

    let mut args = add_args("employer", "employer_name");
    args.files = vec![workspace.contract("a.txt", "ACME GmbH")];
    args.ground_truth = vec!["ACME".to_string(), "Initech".to_string()];

    let result = add_question(args, &session, &formatter(), &mut Cursor::new("")).await;
    assert!(matches!(result, Err(CliError::Extractor(_))));
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn test_ask_unknown_question() {
    let workspace = Workspace::new();
    let llm = MockProvider::default();
    let session = workspace.session(&llm);

    let result = commands::execute_ask(
        AskArgs {
            file: "missing.txt".to_string(),
            question_id: "nope".to_string(),
        },
        &session,
        &formatter(),
    )
    .await;
    assert!(matches!(result, Err(CliError::Extractor(ref e)) if e.is_not_found()));
}

#[tokio::test]
async fn test_process_answers_included_questions() {
    let workspace = Workspace::new();
    let llm = MockProvider::default()
        .with_response("What is the employer?", r#"{"employer_name": "ACME GmbH"}"#)
        .with_response("What is the hours?", "garbage");
    let session = workspace.session(&llm);

    for (name, category) in [("employer", "employer_name"), ("hours", "number")] {
        add_question(add_args(name, category), &session, &formatter(), &mut Cursor::new(""))
            .await
            .unwrap();
    }

    let file = workspace.contract("contract.txt", "Arbeitgeber: ACME GmbH");
    let result = commands::execute_process(ProcessArgs { file }, &session, &formatter())
        .await
        .unwrap();

    assert_eq!(result.answers.len(), 2);
    assert_eq!(result.answers["employer"].to_string(), "ACME GmbH");
    assert!(result.answers["hours"].is_not_available());
}

#[tokio::test]
async fn test_remove_question() {
    let workspace = Workspace::new();
    let llm = MockProvider::default();
    let session = workspace.session(&llm);
    add_question(add_args("employer", "employer_name"), &session, &formatter(), &mut Cursor::new(""))
        .await
        .unwrap();

    let removed = remove_question(
        RemoveQuestionArgs {
            name: "employer".to_string(),
            delete_prompt: true,
            yes: false,
        },
        &session,
        &formatter(),
        &mut Cursor::new("y\n"),
    )
    .unwrap();

    assert!(removed);
    assert!(session.registry.is_empty());
    assert!(!workspace.config.extractor.prompt_folder.join("question_employer.txt").exists());

    let again = remove_question(
        RemoveQuestionArgs {
            name: "employer".to_string(),
            delete_prompt: false,
            yes: true,
        },
        &session,
        &formatter(),
        &mut Cursor::new(""),
    );
    assert!(matches!(again, Err(CliError::Store(_))));
}
