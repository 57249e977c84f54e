use std::env;

use serde::{Deserialize, Serialize};

fn default_interval_ms() -> u64 {
    1000
}

fn default_timeout_ms() -> u64 {
    2000
}

fn default_source() -> String {
    "primary".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct CaptureConfig {
    /// Cycle cadence. A cycle that overruns the interval causes the next
    /// tick to be skipped, never queued.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Source label: "primary" for the primary monitor, or a window title
    /// substring prefixed with "window:".
    #[serde(default = "default_source")]
    pub source: String,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            timeout_ms: default_timeout_ms(),
            source: default_source(),
        }
    }
}

impl CaptureConfig {
    pub fn new() -> Self {
        let interval_ms = env::var("CHECK_INTERVAL_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_interval_ms);

        Self {
            interval_ms,
            ..Self::default()
        }
    }
}
