use std::time::{Duration, UNIX_EPOCH};

use miru_types::ChangeEvent;
use serde_json::json;

use crate::{EventSink, SinkError};

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Sink that POSTs each event as JSON to a configured URL.
pub struct WebhookSink {
    url: String,
    client: reqwest::Client,
}

impl WebhookSink {
    pub fn new(url: String) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl EventSink for WebhookSink {
    async fn send(&self, event: &ChangeEvent) -> Result<(), SinkError> {
        let occurred_ms = event
            .occurred_at
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .as_millis() as u64;

        let payload = json!({
            "id": event.id,
            "region": event.region,
            "previous": event.previous,
            "current": event.current,
            "confidence": event.confidence,
            "occurred_at_ms": occurred_ms,
        });

        let response = self
            .client
            .post(&self.url)
            .timeout(SEND_TIMEOUT)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SinkError::Rejected(format!(
                "status {}",
                response.status()
            )));
        }
        Ok(())
    }
}
