mod log;
mod webhook;

use miru_config::sink::{SinkConfig, SinkKind};
use miru_types::ChangeEvent;

pub use log::LogSink;
pub use webhook::WebhookSink;

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("sink rejected event: {0}")]
    Rejected(String),

    #[error("sink misconfigured: {0}")]
    Misconfigured(String),
}

/// Downstream event consumer. A failing sink loses that one event and is
/// reported by the caller; it must never stop monitoring.
#[async_trait::async_trait]
pub trait EventSink: Send + Sync {
    async fn send(&self, event: &ChangeEvent) -> Result<(), SinkError>;
}

/// Build the configured sink. A webhook sink without a URL is a startup
/// error, not a runtime one.
pub fn from_config(config: &SinkConfig) -> Result<Box<dyn EventSink>, SinkError> {
    match config.kind {
        SinkKind::Log => Ok(Box::new(LogSink)),
        SinkKind::Webhook => {
            let url = config.url.clone().ok_or_else(|| {
                SinkError::Misconfigured("webhook sink requires a url".to_string())
            })?;
            Ok(Box::new(WebhookSink::new(url)))
        }
    }
}
