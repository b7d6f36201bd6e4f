//! Scrivener Router
//!
//! HTTP front end for contract extraction. Reads a contract from a local
//! path or URL, answers one or all registered questions and administers the
//! question registry.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;
pub mod webhook;

use config::RouterConfig;
use handlers::{build_state, create_router};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Router error
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),

    /// Registry could not be loaded
    #[error("Store error: {0}")]
    Store(#[from] scrivener_store::StoreError),

    /// Completion provider could not be built
    #[error("LLM error: {0}")]
    Llm(#[from] scrivener_llm::LlmError),
}

/// Start the Router HTTP server
///
/// Loads the question registry, builds the configured completion provider
/// and serves until the process is stopped.
pub async fn start_server(config: RouterConfig) -> Result<(), RouterError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A subscriber may already be installed (e.g. by a test harness)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    info!("Starting Scrivener Router");
    info!("Bind address: {}", config.bind_addr());
    info!("Registry: {}", config.extractor.registry_file.display());
    info!("Prompt folder: {}", config.extractor.prompt_folder.display());
    info!("LLM: {:?} {} at {}", config.llm.provider, config.llm.model, config.llm.endpoint);
    if let Some(url) = &config.webhook_url {
        info!("Webhook: {}", url);
    }

    let state = build_state(&config)?;
    info!("Registered questions: {}", state.registry.len());

    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Router listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| RouterError::Server(e.to_string()))?;

    Ok(())
}
