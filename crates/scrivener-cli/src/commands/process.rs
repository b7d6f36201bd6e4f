//! Process command implementation.

use super::Session;
use crate::cli::ProcessArgs;
use crate::error::Result;
use crate::output::Formatter;
use scrivener_extractor::ExtractionResult;

/// Execute the process command.
pub async fn execute_process(
    args: ProcessArgs,
    session: &Session,
    formatter: &Formatter,
) -> Result<ExtractionResult> {
    let contract = session.read_contract(&args.file).await?;
    let result = session.extractor.answer_all(&contract, &session.context()).await?;

    println!("{}", formatter.format_answers(&result.answers)?);
    if result.not_available_count() > 0 {
        eprintln!(
            "{}",
            formatter.warning(&format!(
                "{} of {} answers not available",
                result.not_available_count(),
                result.metadata.questions_asked
            ))
        );
    }
    Ok(result)
}
