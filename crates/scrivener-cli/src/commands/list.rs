//! List-questions command implementation.

use super::Session;
use crate::error::Result;
use crate::output::Formatter;

/// Execute the list-questions command.
pub fn execute_list_questions(session: &Session, formatter: &Formatter) -> Result<()> {
    println!("{}", formatter.format_questions(&session.registry.list_all())?);
    Ok(())
}
