//! Remove-question command implementation.

use super::{confirm, Session};
use crate::cli::RemoveQuestionArgs;
use crate::error::Result;
use crate::output::Formatter;
use std::io::{self, BufRead};

/// Execute the remove-question command, asking for approval on stdin.
pub fn execute_remove_question(
    args: RemoveQuestionArgs,
    session: &Session,
    formatter: &Formatter,
) -> Result<bool> {
    let stdin = io::stdin();
    remove_question(args, session, formatter, &mut stdin.lock())
}

/// Remove a question from the registry. Returns whether it was removed.
pub fn remove_question(
    args: RemoveQuestionArgs,
    session: &Session,
    formatter: &Formatter,
    input: &mut impl BufRead,
) -> Result<bool> {
    let record = session
        .registry
        .get(&args.name)
        .ok_or_else(|| scrivener_store::StoreError::NotFound(args.name.clone()))?;

    if !args.yes && !confirm(&format!("Remove question '{}'?", args.name), input)? {
        println!("{}", formatter.info("Operation cancelled"));
        return Ok(false);
    }

    session.registry.remove(&args.name)?;
    if args.delete_prompt && session.prompts.delete(&record.prompt_file)? {
        println!("{}", formatter.info(&format!("Deleted {}", record.prompt_file)));
    }

    println!("{}", formatter.success(&format!("Removed question '{}'", args.name)));
    Ok(true)
}
