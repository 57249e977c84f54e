use miru_types::Rect;
use serde::{Deserialize, Serialize};

fn default_min_confidence() -> f32 {
    0.3
}

fn default_debounce_threshold() -> u32 {
    2
}

fn default_max_pending_age_ms() -> u64 {
    30_000
}

/// One region of interest. Immutable for the lifetime of a run; exactly
/// one history entry in the change engine corresponds to each region.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RegionConfig {
    pub name: String,
    pub rect: Rect,
    /// Language hints forwarded to the OCR engine, e.g. ["ja", "en"].
    #[serde(default)]
    pub languages: Vec<String>,
    /// Fragments below this confidence are dropped before normalization.
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f32,
    /// Consecutive matching observations required to confirm a change.
    #[serde(default = "default_debounce_threshold")]
    pub debounce_threshold: u32,
    /// A pending candidate older than this is abandoned without emitting.
    #[serde(default = "default_max_pending_age_ms")]
    pub max_pending_age_ms: u64,
}

impl RegionConfig {
    pub fn new(name: impl Into<String>, rect: Rect) -> Self {
        Self {
            name: name.into(),
            rect,
            languages: Vec::new(),
            min_confidence: default_min_confidence(),
            debounce_threshold: default_debounce_threshold(),
            max_pending_age_ms: default_max_pending_age_ms(),
        }
    }
}
