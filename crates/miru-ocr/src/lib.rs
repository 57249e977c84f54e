mod engine;
mod http;
mod invoker;

pub use engine::{OcrEngine, OcrError};
pub use http::HttpOcrEngine;
pub use invoker::OcrInvoker;
