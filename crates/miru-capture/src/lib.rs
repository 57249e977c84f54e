mod extract;
mod screen;
mod source;

pub use extract::{extract_region, extract_regions};
pub use screen::ScreenSource;
pub use source::{CaptureError, FrameSource};
