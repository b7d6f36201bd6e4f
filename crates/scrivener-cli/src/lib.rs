//! Scrivener CLI library.
//!
//! Runs the extraction pipeline locally against the configured question
//! registry, prompt folder and completion provider, and formats the results
//! for the terminal.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use commands::Session;
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
