//! Ask command implementation.

use super::Session;
use crate::cli::AskArgs;
use crate::error::Result;
use crate::output::Formatter;
use scrivener_domain::Answer;
use scrivener_extractor::ExtractorError;

/// Execute the ask command.
pub async fn execute_ask(args: AskArgs, session: &Session, formatter: &Formatter) -> Result<Answer> {
    // Unknown ids fail before the contract is read
    if !session.registry.contains(&args.question_id) {
        return Err(ExtractorError::QuestionNotFound(args.question_id).into());
    }

    let contract = session.read_contract(&args.file).await?;
    let answer = session
        .extractor
        .answer_one(&contract, &args.question_id, &session.context())
        .await?;

    println!("{}", formatter.format_answer(&args.question_id, &answer)?);
    Ok(answer)
}
