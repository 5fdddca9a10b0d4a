use chrono::{Datelike, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

/// Hours of the day during which valuation reposting may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepostingWindow {
    pub enabled: bool,
    pub start: NaiveTime,
    pub end: NaiveTime,
    /// The window is ignored all day on this weekday
    pub exempt_weekday: Option<Weekday>,
}

impl Default for RepostingWindow {
    fn default() -> Self {
        Self {
            enabled: false,
            start: NaiveTime::MIN,
            end: NaiveTime::MIN,
            exempt_weekday: None,
        }
    }
}

/// Whether reposting may run at `now`. A window whose start is after its
/// end wraps past midnight. Both bounds are inclusive.
pub fn in_configured_timeslot(window: &RepostingWindow, now: NaiveDateTime) -> bool {
    if !window.enabled {
        return true;
    }

    if window.exempt_weekday == Some(now.weekday()) {
        return true;
    }

    let current = now.time();
    if window.start < window.end {
        window.start <= current && current <= window.end
    } else {
        current >= window.start || current <= window.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use test_case::test_case;

    fn t(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M:%S").unwrap()
    }

    fn window(start: &str, end: &str) -> RepostingWindow {
        RepostingWindow {
            enabled: true,
            start: t(start),
            end: t(end),
            exempt_weekday: None,
        }
    }

    // 2024-03-13 is a Wednesday
    fn at(time: &str) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 13).unwrap().and_time(t(time))
    }

    #[test_case("18:00:00", "09:00:00", "20:00:00" => true; "wrapping window evening")]
    #[test_case("09:00:00", "18:00:00", "12:00:00" => true; "daytime window")]
    #[test_case("23:00:00", "09:00:00", "02:00:00" => true; "wrapping window after midnight")]
    #[test_case("18:00:00", "09:00:00", "09:01:00" => false; "just after wrapping window")]
    #[test_case("09:00:00", "18:00:00", "19:00:00" => false; "after daytime window")]
    #[test_case("23:00:00", "09:00:00", "22:00:00" => false; "before wrapping window")]
    #[test_case("09:00:00", "18:00:00", "18:00:00" => true; "end bound inclusive")]
    fn window_cases(start: &str, end: &str, now: &str) -> bool {
        in_configured_timeslot(&window(start, end), at(now))
    }

    #[test]
    fn disabled_window_is_always_open() {
        let mut w = window("09:00:00", "10:00:00");
        w.enabled = false;
        assert!(in_configured_timeslot(&w, at("23:59:59")));
        assert!(in_configured_timeslot(&RepostingWindow::default(), at("12:00:00")));
    }

    #[test]
    fn exempt_weekday_is_open_all_day() {
        let mut w = window("23:00:00", "09:00:00");
        w.exempt_weekday = Some(Weekday::Wed);
        assert!(in_configured_timeslot(&w, at("15:00:00")));

        w.exempt_weekday = Some(Weekday::Sun);
        assert!(!in_configured_timeslot(&w, at("15:00:00")));
    }
}
