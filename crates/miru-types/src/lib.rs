mod types;

pub use types::{
    ChangeEvent, Frame, Observation, RecognitionRecord, Rect, RegionImage, TextFragment,
};
