use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Axis-aligned rectangle in frame coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    pub fn center_y(&self) -> f32 {
        self.y as f32 + self.height as f32 / 2.0
    }
}

/// One captured frame. Owned by the cycle that captured it and dropped
/// when the cycle completes.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Raw RGBA pixel data, row-major.
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub captured_at: SystemTime,
    pub source: String,
}

/// A cropped sub-image for one region of a frame.
#[derive(Debug, Clone)]
pub struct RegionImage {
    pub region: String,
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub captured_at: SystemTime,
}

/// A single recognized text fragment with its confidence and location
/// within the region image.
#[derive(Debug, Clone, PartialEq)]
pub struct TextFragment {
    pub text: String,
    pub confidence: f32,
    pub bbox: Rect,
}

/// OCR output for one region in one frame, confidence-filtered.
#[derive(Debug, Clone)]
pub struct RecognitionRecord {
    pub region: String,
    pub fragments: Vec<TextFragment>,
    pub captured_at: SystemTime,
}

/// Canonicalized text for one region in one frame. Empty `text` means the
/// region was observed and contained no (confident) text, which is distinct
/// from the region failing to produce an observation at all.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub region: String,
    pub text: String,
    pub confidence: f32,
    pub observed_at: SystemTime,
}

/// A debounce-confirmed text transition for one region.
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    pub id: Uuid,
    pub region: String,
    pub previous: String,
    pub current: String,
    pub confidence: f32,
    pub occurred_at: SystemTime,
}

impl ChangeEvent {
    pub fn new(
        region: String,
        previous: String,
        current: String,
        confidence: f32,
        occurred_at: SystemTime,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            region,
            previous,
            current,
            confidence,
            occurred_at,
        }
    }
}
