//! Shared HTTP plumbing for the remote providers

use crate::LlmError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Upper bound on attempts per completion; keeps the backoff under ~8.5 min
pub const MAX_RETRIES_LIMIT: u32 = 10;

/// Build the client used by the remote providers
///
/// Connection pooling is disabled: a provider may be driven from a fresh
/// runtime on each call, and pooled connections die with their runtime.
pub(crate) fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .pool_max_idle_per_host(0)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// POST `body` as JSON and decode the JSON reply, retrying transient failures
///
/// Backoff is exponential: 1s, 2s, 4s, ... A 404 is reported as an
/// unavailable model and is not retried.
pub(crate) async fn post_json_with_retry<B, R>(
    client: &reqwest::Client,
    url: &str,
    body: &B,
    model: &str,
    max_retries: u32,
) -> Result<R, LlmError>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let max_attempts = max_retries.clamp(1, MAX_RETRIES_LIMIT);
    let mut attempts = 0;
    let mut last_error = None;

    while attempts < max_attempts {
        match client.post(url).json(body).send().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    return response.json::<R>().await.map_err(|e| {
                        LlmError::InvalidResponse(format!("Failed to parse response: {}", e))
                    });
                } else if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(LlmError::ModelNotAvailable(model.to_string()));
                } else {
                    let error_text = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    last_error = Some(LlmError::Communication(format!(
                        "HTTP {}: {}",
                        status, error_text
                    )));
                }
            }
            Err(e) => {
                last_error = Some(LlmError::Communication(format!("Request failed: {}", e)));
            }
        }

        attempts += 1;
        if attempts < max_attempts {
            let delay = Duration::from_secs(2u64.pow(attempts - 1));
            warn!(
                "Completion request to {} failed (attempt {}/{}), retrying in {:?}",
                url, attempts, max_attempts, delay
            );
            tokio::time::sleep(delay).await;
        }
    }

    debug!("Giving up on {} after {} attempts", url, attempts);
    Err(last_error.unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
}
