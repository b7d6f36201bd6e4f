//! Scrivener Router CLI
//!
//! Starts the HTTP server that answers questions about contracts.

use anyhow::Context;
use scrivener_router::{config::RouterConfig, start_server};
use std::env;
use std::process;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    let config = if args.len() > 2 && args[1] == "--config" {
        let config_path = &args[2];
        RouterConfig::from_file(config_path)
            .with_context(|| format!("loading {}", config_path))?
    } else if args.len() > 1 && args[1] == "--help" {
        print_help();
        process::exit(0);
    } else {
        eprintln!("Warning: No config file specified, using default test configuration");
        eprintln!("Usage: scrivener-router --config <path-to-config.toml>");
        eprintln!();
        RouterConfig::default_test_config()
    };

    start_server(config).await?;

    Ok(())
}

fn print_help() {
    println!("Scrivener Router - Contract question answering over HTTP");
    println!();
    println!("USAGE:");
    println!("    scrivener-router --config <path-to-config.toml>");
    println!();
    println!("OPTIONS:");
    println!("    --config <file>    Load configuration from TOML file");
    println!("    --help             Print this help message");
    println!();
    println!("EXAMPLE:");
    println!("    scrivener-router --config config/scrivener.toml");
    println!();
    println!("CONFIGURATION:");
    println!("    The TOML config file may contain:");
    println!("    - bind_address / bind_port: listen address (default 0.0.0.0:5001)");
    println!("    - webhook_url: receives every process_contract result");
    println!("    - [extractor]: registry_file, prompt_folder, template_file, ...");
    println!("    - [llm]: provider (mock | ollama | vllm), endpoint, model, sampling");
    println!();
    println!("    Set RUST_LOG to adjust logging (default: info).");
    println!();
}
