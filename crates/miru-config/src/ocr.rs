use std::env;

use serde::{Deserialize, Serialize};

fn default_endpoint() -> String {
    "http://localhost:8089/v1/recognize".to_string()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_max_retries() -> u32 {
    2
}

fn default_backoff_ms() -> u64 {
    250
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct OcrConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    pub api_key: Option<String>,
    /// Per-call deadline for one engine invocation (one attempt).
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Retries after the first attempt, for timeouts and transient
    /// engine errors only.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Base backoff, doubled per retry.
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: None,
            timeout_ms: default_timeout_ms(),
            max_retries: default_max_retries(),
            backoff_ms: default_backoff_ms(),
        }
    }
}

impl OcrConfig {
    pub fn new() -> Self {
        let endpoint = env::var("OCR_ENDPOINT").unwrap_or_else(|_| default_endpoint());
        let api_key = env::var("OCR_API_KEY").ok();

        Self {
            endpoint,
            api_key,
            ..Self::default()
        }
    }
}
