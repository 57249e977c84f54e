use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use self::capture::CaptureConfig;
use self::hours::ActiveHours;
use self::ocr::OcrConfig;
use self::region::RegionConfig;
use self::sink::SinkConfig;

pub mod capture;
pub mod hours;
pub mod ocr;
pub mod region;
pub mod sink;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("no regions configured")]
    NoRegions,

    #[error("duplicate region name: {0}")]
    DuplicateRegion(String),

    #[error("region {0} has zero area")]
    EmptyRegion(String),
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub capture: CaptureConfig,
    pub ocr: OcrConfig,
    pub sink: SinkConfig,
    pub regions: Vec<RegionConfig>,
    pub active_hours: Option<ActiveHours>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            capture: CaptureConfig::new(),
            ocr: OcrConfig::new(),
            sink: SinkConfig::default(),
            regions: Vec::new(),
            active_hours: None,
        }
    }
}

impl Config {
    /// Config with env-var fallbacks only, no profile file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a JSON profile, then let env vars override the global knobs.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut config: Config = serde_json::from_reader(reader)?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Some(v) = env::var("CHECK_INTERVAL_MS").ok().and_then(|v| v.parse().ok()) {
            self.capture.interval_ms = v;
        }
        if let Ok(v) = env::var("OCR_ENDPOINT") {
            self.ocr.endpoint = v;
        }
        if let Ok(v) = env::var("OCR_API_KEY") {
            self.ocr.api_key = Some(v);
        }
        if let Ok(v) = env::var("SINK_URL") {
            self.sink.url = Some(v);
        }
        if env::var("ALLOW_OUTSIDE_ACTIVE_HOURS")
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
        {
            self.active_hours = None;
        }
    }

    /// Startup validation. Violations here are fatal; runtime region
    /// problems (partial overlap with the frame) are clipped instead.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.regions.is_empty() {
            return Err(ConfigError::NoRegions);
        }
        let mut seen = Vec::with_capacity(self.regions.len());
        for region in &self.regions {
            if seen.contains(&&region.name) {
                return Err(ConfigError::DuplicateRegion(region.name.clone()));
            }
            if region.rect.width == 0 || region.rect.height == 0 {
                return Err(ConfigError::EmptyRegion(region.name.clone()));
            }
            seen.push(&region.name);
        }
        Ok(())
    }
}
