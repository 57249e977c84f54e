pub mod engine;
pub mod normalize;

pub use engine::{ChangeEngine, EngineError, RegionState};
pub use normalize::normalize;
