use std::collections::HashMap;
use std::time::{Duration, SystemTime};

use miru_config::region::RegionConfig;
use miru_types::{ChangeEvent, Observation};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("observation for unconfigured region: {0}")]
    UnknownRegion(String),
}

/// Debounce state for one region.
#[derive(Debug, Clone, PartialEq)]
pub enum RegionState {
    /// No candidate in flight; the confirmed text stands.
    Stable,
    /// A value differing from the confirmed text, seen `count` consecutive
    /// times. At most one candidate per region, always the most recent
    /// distinct value.
    Pending {
        candidate: String,
        count: u32,
        first_seen: SystemTime,
    },
}

struct RegionEntry {
    debounce_threshold: u32,
    max_pending_age: Duration,
    /// None until the first observation seeds the baseline. After that it
    /// changes only through a debounce-confirmed transition.
    stable_text: Option<String>,
    stable_since: Option<SystemTime>,
    last_seen: Option<SystemTime>,
    state: RegionState,
}

impl RegionEntry {
    fn from_config(config: &RegionConfig) -> Self {
        Self {
            debounce_threshold: config.debounce_threshold.max(1),
            max_pending_age: Duration::from_millis(config.max_pending_age_ms),
            stable_text: None,
            stable_since: None,
            last_seen: None,
            state: RegionState::Stable,
        }
    }
}

/// Per-region change detection with temporal debouncing. The only
/// component that carries state across cycles; the caller must serialize
/// `observe` calls (single writer).
pub struct ChangeEngine {
    regions: HashMap<String, RegionEntry>,
}

impl ChangeEngine {
    pub fn new(regions: &[RegionConfig]) -> Self {
        Self {
            regions: regions
                .iter()
                .map(|r| (r.name.clone(), RegionEntry::from_config(r)))
                .collect(),
        }
    }

    /// Feed one observation through the state machine. Returns an event
    /// only when a transition is debounce-confirmed.
    pub fn observe(&mut self, obs: &Observation) -> Result<Option<ChangeEvent>, EngineError> {
        let entry = self
            .regions
            .get_mut(&obs.region)
            .ok_or_else(|| EngineError::UnknownRegion(obs.region.clone()))?;

        // A candidate that sat unconfirmed across a long observation gap
        // is abandoned; the confirmed text is retained.
        if let RegionState::Pending { .. } = entry.state {
            if let Some(last) = entry.last_seen {
                let gap = obs
                    .observed_at
                    .duration_since(last)
                    .unwrap_or(Duration::ZERO);
                if gap > entry.max_pending_age {
                    entry.state = RegionState::Stable;
                }
            }
        }
        entry.last_seen = Some(obs.observed_at);

        // First observation seeds the baseline without emitting.
        let Some(stable) = entry.stable_text.as_deref() else {
            entry.stable_text = Some(obs.text.clone());
            entry.stable_since = Some(obs.observed_at);
            return Ok(None);
        };

        if obs.text == stable {
            // A return to the confirmed value marks any candidate as noise.
            entry.state = RegionState::Stable;
            return Ok(None);
        }

        let count = match &entry.state {
            RegionState::Pending { candidate, count, .. } if *candidate == obs.text => count + 1,
            _ => 1,
        };

        if count >= entry.debounce_threshold {
            let event = ChangeEvent::new(
                obs.region.clone(),
                stable.to_string(),
                obs.text.clone(),
                obs.confidence,
                obs.observed_at,
            );
            entry.stable_text = Some(obs.text.clone());
            entry.stable_since = Some(obs.observed_at);
            entry.state = RegionState::Stable;
            return Ok(Some(event));
        }

        let first_seen = match &entry.state {
            RegionState::Pending {
                candidate,
                first_seen,
                ..
            } if *candidate == obs.text => *first_seen,
            _ => obs.observed_at,
        };
        entry.state = RegionState::Pending {
            candidate: obs.text.clone(),
            count,
            first_seen,
        };
        Ok(None)
    }

    /// Currently confirmed text for a region, once a baseline exists.
    pub fn stable_text(&self, region: &str) -> Option<&str> {
        self.regions.get(region)?.stable_text.as_deref()
    }

    pub fn state(&self, region: &str) -> Option<&RegionState> {
        self.regions.get(region).map(|e| &e.state)
    }

    /// Drop a region's history. Only used on explicit reconfiguration.
    pub fn reset(&mut self, region: &str, config: &RegionConfig) {
        self.regions
            .insert(region.to_string(), RegionEntry::from_config(config));
    }
}
