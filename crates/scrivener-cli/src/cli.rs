//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Scrivener CLI - Ask questions about contracts and manage the question registry.
#[derive(Debug, Parser)]
#[command(name = "scrivener")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path (default: ~/.scrivener/config.toml)
    #[arg(short, long, global = true, env = "SCRIVENER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (values only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Answer one registered question about a contract
    Ask(AskArgs),

    /// Answer every included question about a contract
    Process(ProcessArgs),

    /// Draft a new question, evaluate it and add it to the registry
    AddQuestion(AddQuestionArgs),

    /// Remove a question from the registry
    RemoveQuestion(RemoveQuestionArgs),

    /// List registered questions
    ListQuestions,
}

/// Arguments for the ask command.
#[derive(Debug, Parser)]
pub struct AskArgs {
    /// Contract path or http(s) URL
    pub file: String,

    /// Question id
    pub question_id: String,
}

/// Arguments for the process command.
#[derive(Debug, Parser)]
pub struct ProcessArgs {
    /// Contract path or http(s) URL
    pub file: String,
}

/// Arguments for the add-question command.
#[derive(Debug, Parser)]
pub struct AddQuestionArgs {
    /// The question in one or two sentences
    pub question: String,

    /// Id to register the question under
    #[arg(short, long)]
    pub name: String,

    /// Answer category (e.g. string, number, float, date, start_date)
    #[arg(short = 't', long = "category")]
    pub category: String,

    /// Description of the expected answer format
    #[arg(short, long, default_value = "")]
    pub expected_format: String,

    /// Sample contract to evaluate the prompt on (repeatable)
    #[arg(long = "file")]
    pub files: Vec<String>,

    /// Known answer for the matching --file (repeatable)
    #[arg(long = "truth")]
    pub ground_truth: Vec<String>,

    /// Accepted absolute difference for numeric answers
    #[arg(long, default_value = "0")]
    pub tolerance: f64,

    /// Add without asking for confirmation
    #[arg(short = 'y', long)]
    pub yes: bool,
}

/// Arguments for the remove-question command.
#[derive(Debug, Parser)]
pub struct RemoveQuestionArgs {
    /// Question id
    pub name: String,

    /// Also delete the question's prompt file
    #[arg(long)]
    pub delete_prompt: bool,

    /// Skip confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}
