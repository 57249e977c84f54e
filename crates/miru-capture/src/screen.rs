use std::time::{Duration, SystemTime};

use miru_config::capture::CaptureConfig;
use miru_types::Frame;
use xcap::{Monitor, Window};

use crate::source::{CaptureError, FrameSource};

/// Screen-grab source backed by xcap. The grab itself is blocking, so it
/// runs on the blocking pool with a deadline around it.
pub struct ScreenSource {
    source: String,
    timeout: Duration,
}

impl ScreenSource {
    pub fn new(config: &CaptureConfig) -> Self {
        Self {
            source: config.source.clone(),
            timeout: Duration::from_millis(config.timeout_ms),
        }
    }

    fn grab(source: &str) -> Result<Frame, CaptureError> {
        let image = if let Some(title) = source.strip_prefix("window:") {
            let windows =
                Window::all().map_err(|e| CaptureError::Unavailable(e.to_string()))?;
            let window = windows
                .into_iter()
                .find(|w| {
                    w.title()
                        .to_lowercase()
                        .contains(&title.to_lowercase())
                })
                .ok_or_else(|| {
                    CaptureError::Unavailable(format!("no window matching '{title}'"))
                })?;
            window
                .capture_image()
                .map_err(|e| CaptureError::Unavailable(e.to_string()))?
        } else {
            let monitors =
                Monitor::all().map_err(|e| CaptureError::Unavailable(e.to_string()))?;
            let monitor = monitors
                .first()
                .ok_or_else(|| CaptureError::Unavailable("no monitor found".to_string()))?;
            monitor
                .capture_image()
                .map_err(|e| CaptureError::Unavailable(e.to_string()))?
        };

        Ok(Frame {
            width: image.width(),
            height: image.height(),
            data: image.into_raw(),
            captured_at: SystemTime::now(),
            source: source.to_string(),
        })
    }
}

#[async_trait::async_trait]
impl FrameSource for ScreenSource {
    async fn capture(&self) -> Result<Frame, CaptureError> {
        let source = self.source.clone();
        let grab = tokio::task::spawn_blocking(move || Self::grab(&source));

        match tokio::time::timeout(self.timeout, grab).await {
            Ok(Ok(result)) => result,
            Ok(Err(join)) => Err(CaptureError::Unavailable(join.to_string())),
            Err(_) => Err(CaptureError::Timeout(self.timeout)),
        }
    }
}
