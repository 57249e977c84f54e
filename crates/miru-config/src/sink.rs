use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SinkKind {
    /// Structured log entries only.
    #[default]
    Log,
    /// POST the event record as JSON to `url`.
    Webhook,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct SinkConfig {
    pub kind: SinkKind,
    pub url: Option<String>,
}
