use std::time::Duration;

use miru_types::Frame;

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// The backend cannot produce a frame right now (device busy,
    /// permission denied, window gone).
    #[error("capture backend unavailable: {0}")]
    Unavailable(String),

    #[error("frame acquisition exceeded {0:?}")]
    Timeout(Duration),

    /// The region lies entirely outside the frame. Partial overlap is
    /// clipped instead.
    #[error("region '{0}' lies entirely outside the frame")]
    InvalidRegion(String),
}

/// Frame acquisition seam. Implementations own the backend handle and any
/// resource use; the monitor only ever asks for one frame at a time.
#[async_trait::async_trait]
pub trait FrameSource: Send + Sync {
    async fn capture(&self) -> Result<Frame, CaptureError>;
}
