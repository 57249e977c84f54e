use std::time::Duration;

use miru_types::{RegionImage, TextFragment};

#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    /// Transient engine-side failure, eligible for retry.
    #[error("engine error: {0}")]
    Engine(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("recognition timed out after {0:?}")]
    Timeout(Duration),

    #[error("recognition failed after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: String },

    /// The monitor is shutting down; any late result must be discarded.
    #[error("recognition cancelled")]
    Cancelled,

    #[error("image encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// External OCR engine seam. One call recognizes one region image and
/// returns raw fragments; timeout, retry and confidence policy live in
/// the invoker, not here.
#[async_trait::async_trait]
pub trait OcrEngine: Send + Sync {
    async fn recognize(
        &self,
        image: &RegionImage,
        languages: &[String],
    ) -> Result<Vec<TextFragment>, OcrError>;
}
