use miru_types::ChangeEvent;

use crate::{EventSink, SinkError};

/// Sink that records events as structured log entries.
pub struct LogSink;

#[async_trait::async_trait]
impl EventSink for LogSink {
    async fn send(&self, event: &ChangeEvent) -> Result<(), SinkError> {
        tracing::info!(
            event_id = %event.id,
            region = %event.region,
            previous = %event.previous,
            current = %event.current,
            confidence = event.confidence,
            "text changed"
        );
        Ok(())
    }
}
