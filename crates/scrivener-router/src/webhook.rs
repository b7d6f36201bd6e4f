//! Delivery of batch results to a webhook

use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};

/// POSTs results as JSON to a fixed URL
#[derive(Debug, Clone)]
pub struct WebhookClient {
    url: String,
    client: reqwest::Client,
}

impl WebhookClient {
    /// Create a client for `url`
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            url: url.into(),
            client,
        }
    }

    /// Target URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send `payload`; returns whether the webhook accepted it
    ///
    /// Failures are logged and never propagated.
    pub async fn deliver<T: Serialize + ?Sized>(&self, payload: &T) -> bool {
        match self.client.post(&self.url).json(payload).send().await {
            Ok(response) if response.status().is_success() => {
                info!("Delivered results to webhook {}", self.url);
                true
            }
            Ok(response) => {
                warn!("Webhook {} answered HTTP {}", self.url, response.status());
                false
            }
            Err(e) => {
                warn!("Webhook {} unreachable: {}", self.url, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn test_unreachable_webhook_is_not_fatal() {
        let webhook = WebhookClient::new("http://127.0.0.1:1/hook", Duration::from_secs(2));
        let payload: BTreeMap<String, String> = BTreeMap::new();
        assert!(!webhook.deliver(&payload).await);
    }
}
