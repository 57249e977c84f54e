use serde::{Deserialize, Serialize};

fn default_weekdays_only() -> bool {
    true
}

/// Optional monitoring window in local time. Outside of it the loop idles
/// through ticks without capturing.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ActiveHours {
    /// "HH:MM", inclusive.
    pub start: String,
    /// "HH:MM", inclusive.
    pub end: String,
    #[serde(default = "default_weekdays_only")]
    pub weekdays_only: bool,
}

impl ActiveHours {
    /// Parse "HH:MM" into minutes since midnight. Malformed values fall
    /// back to an always-open window, which validation logs at startup.
    pub fn parse_hhmm(value: &str) -> Option<u32> {
        let (h, m) = value.split_once(':')?;
        let h: u32 = h.parse().ok()?;
        let m: u32 = m.parse().ok()?;
        if h > 23 || m > 59 {
            return None;
        }
        Some(h * 60 + m)
    }
}
