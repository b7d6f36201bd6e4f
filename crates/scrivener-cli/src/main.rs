//! Scrivener CLI - Ask questions about contracts from the command line.

use clap::Parser;
use scrivener_cli::commands;
use scrivener_cli::{Cli, Command, Config, Formatter, Session};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> scrivener_cli::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so JSON output stays parseable
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let config = Config::load(cli.config.as_deref())?;

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    let session = Session::open(&config)?;

    match cli.command {
        Command::Ask(args) => {
            commands::execute_ask(args, &session, &formatter).await?;
        }
        Command::Process(args) => {
            commands::execute_process(args, &session, &formatter).await?;
        }
        Command::AddQuestion(args) => {
            commands::execute_add_question(args, &session, &formatter).await?;
        }
        Command::RemoveQuestion(args) => {
            commands::execute_remove_question(args, &session, &formatter)?;
        }
        Command::ListQuestions => {
            commands::execute_list_questions(&session, &formatter)?;
        }
    }

    Ok(())
}
