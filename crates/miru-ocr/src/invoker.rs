use std::sync::Arc;
use std::time::Duration;

use miru_config::ocr::OcrConfig;
use miru_config::region::RegionConfig;
use miru_types::{RecognitionRecord, RegionImage};
use tokio_util::sync::CancellationToken;

use crate::engine::{OcrEngine, OcrError};

/// Wraps the external engine with the call policy: per-attempt timeout,
/// exponential-backoff retries for transient failures, confidence
/// filtering, and cooperative cancellation.
pub struct OcrInvoker {
    engine: Arc<dyn OcrEngine>,
    timeout: Duration,
    max_retries: u32,
    backoff: Duration,
}

impl OcrInvoker {
    pub fn new(engine: Arc<dyn OcrEngine>, config: &OcrConfig) -> Self {
        Self {
            engine,
            timeout: Duration::from_millis(config.timeout_ms),
            max_retries: config.max_retries,
            backoff: Duration::from_millis(config.backoff_ms),
        }
    }

    /// Recognize one region image. Fails only this region; the caller
    /// decides what a failed region means for the rest of the cycle.
    pub async fn recognize(
        &self,
        image: &RegionImage,
        region: &RegionConfig,
        cancel: &CancellationToken,
    ) -> Result<RecognitionRecord, OcrError> {
        let mut last_error = String::new();
        let attempts = self.max_retries + 1;

        for attempt in 0..attempts {
            if attempt > 0 {
                let backoff = self.backoff * 2u32.pow(attempt - 1);
                tokio::select! {
                    _ = cancel.cancelled() => return Err(OcrError::Cancelled),
                    _ = tokio::time::sleep(backoff) => {}
                }
                tracing::debug!(
                    region = %region.name,
                    attempt,
                    "retrying recognition after {last_error}"
                );
            }

            let call = self.engine.recognize(image, &region.languages);
            let result = tokio::select! {
                _ = cancel.cancelled() => return Err(OcrError::Cancelled),
                result = tokio::time::timeout(self.timeout, call) => result,
            };

            match result {
                Ok(Ok(fragments)) => {
                    let kept: Vec<_> = fragments
                        .into_iter()
                        .filter(|f| f.confidence >= region.min_confidence)
                        .collect();
                    return Ok(RecognitionRecord {
                        region: region.name.clone(),
                        fragments: kept,
                        captured_at: image.captured_at,
                    });
                }
                Ok(Err(OcrError::Cancelled)) => return Err(OcrError::Cancelled),
                Ok(Err(e)) => last_error = e.to_string(),
                Err(_) => last_error = OcrError::Timeout(self.timeout).to_string(),
            }
        }

        Err(OcrError::RetriesExhausted {
            attempts,
            last: last_error,
        })
    }
}
