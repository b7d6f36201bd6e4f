//! Add-question command implementation.

use super::{confirm, Session};
use crate::cli::AddQuestionArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use scrivener_extractor::{include_new_question, pair_ground_truth, EvaluationSample, QuestionDraft};
use std::io::{self, BufRead};

/// Execute the add-question command, asking for approval on stdin.
pub async fn execute_add_question(
    args: AddQuestionArgs,
    session: &Session,
    formatter: &Formatter,
) -> Result<bool> {
    let stdin = io::stdin();
    add_question(args, session, formatter, &mut stdin.lock()).await
}

/// Draft the prompt, evaluate it on the sample contracts and add it once
/// approved. Returns whether the question was added.
pub async fn add_question(
    args: AddQuestionArgs,
    session: &Session,
    formatter: &Formatter,
    input: &mut impl BufRead,
) -> Result<bool> {
    if !args.ground_truth.is_empty() && args.files.is_empty() {
        return Err(CliError::InvalidInput("--truth requires --file".to_string()));
    }

    let draft = QuestionDraft {
        question: args.question,
        name_of_entity: args.name,
        category: args.category,
        expected_format: args.expected_format,
    };
    let authored = session
        .extractor
        .draft_question(&draft, &session.schemas, &session.prompts)?;

    if session.registry.contains(&authored.question_id) {
        println!(
            "{}",
            formatter.warning(&format!(
                "Question '{}' already exists and will be replaced",
                authored.question_id
            ))
        );
    }
    println!("{}", formatter.info("Rendered prompt:"));
    println!("{}", authored.prompt);

    if !args.files.is_empty() {
        let truths = (!args.ground_truth.is_empty()).then_some(args.ground_truth.as_slice());
        let pairs = pair_ground_truth(&args.files, truths)?;

        let mut samples = Vec::with_capacity(pairs.len());
        for (locator, ground_truth) in pairs {
            let contract = session.read_contract(&locator).await?;
            samples.push(EvaluationSample {
                locator,
                contract,
                ground_truth,
            });
        }

        let report = session
            .extractor
            .evaluate_question(&authored, &session.schemas, &samples, args.tolerance)
            .await?;
        println!("{}", formatter.format_evaluation(&report)?);
    }

    if !args.yes && !confirm(&format!("Add question '{}'?", authored.question_id), input)? {
        println!("{}", formatter.info("Question not added"));
        return Ok(false);
    }

    include_new_question(&authored, &session.prompts, &session.registry)?;
    println!(
        "{}",
        formatter.success(&format!(
            "Added question '{}' ({})",
            authored.question_id, authored.prompt_file
        ))
    );
    Ok(true)
}
