use chrono::{DateTime, Datelike, Local, Timelike};
use miru_config::hours::ActiveHours;

/// Whether monitoring should run at `now`. No configured window means
/// always on. A window whose times fail to parse is treated as open.
pub fn within_active_hours(hours: Option<&ActiveHours>, now: DateTime<Local>) -> bool {
    let Some(hours) = hours else {
        return true;
    };

    if hours.weekdays_only && now.weekday().number_from_monday() > 5 {
        return false;
    }

    let (Some(start), Some(end)) = (
        ActiveHours::parse_hhmm(&hours.start),
        ActiveHours::parse_hhmm(&hours.end),
    ) else {
        return true;
    };

    let minute = now.hour() * 60 + now.minute();
    if start <= end {
        start <= minute && minute <= end
    } else {
        // Overnight window, e.g. 22:00 - 06:00.
        minute >= start || minute <= end
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn hours(start: &str, end: &str, weekdays_only: bool) -> ActiveHours {
        ActiveHours {
            start: start.to_string(),
            end: end.to_string(),
            weekdays_only,
        }
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn no_window_is_always_open() {
        assert!(within_active_hours(None, at(2026, 8, 26, 3, 0)));
    }

    #[test]
    fn inside_window_on_a_weekday() {
        let w = hours("09:00", "13:35", true);
        // 2026-08-26 is a Wednesday.
        assert!(within_active_hours(Some(&w), at(2026, 8, 26, 10, 30)));
    }

    #[test]
    fn outside_window_hours() {
        let w = hours("09:00", "13:35", true);
        assert!(!within_active_hours(Some(&w), at(2026, 8, 26, 14, 0)));
        assert!(!within_active_hours(Some(&w), at(2026, 8, 26, 8, 59)));
    }

    #[test]
    fn weekend_is_closed_when_weekdays_only() {
        let w = hours("09:00", "13:35", true);
        // 2026-08-29 is a Saturday.
        assert!(!within_active_hours(Some(&w), at(2026, 8, 29, 10, 0)));
        let open = hours("09:00", "13:35", false);
        assert!(within_active_hours(Some(&open), at(2026, 8, 29, 10, 0)));
    }

    #[test]
    fn overnight_window_wraps_midnight() {
        let w = hours("22:00", "06:00", false);
        assert!(within_active_hours(Some(&w), at(2026, 8, 26, 23, 0)));
        assert!(within_active_hours(Some(&w), at(2026, 8, 26, 5, 0)));
        assert!(!within_active_hours(Some(&w), at(2026, 8, 26, 12, 0)));
    }

    #[test]
    fn malformed_times_fall_back_to_open() {
        let w = hours("9am", "1pm", false);
        assert!(within_active_hours(Some(&w), at(2026, 8, 26, 3, 0)));
    }
}
