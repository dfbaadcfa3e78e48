use std::fmt;

use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, TimeZone};
use serde::Serialize;

/// Canonical day format. Lexicographic order of these strings is chronological order.
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// Calendar day an instant falls on, in the instant's own time zone.
///
/// Pass a `DateTime<Local>` to get the user's local day. The conversion never goes
/// through UTC, so an evening entry west of Greenwich stays on its local day.
#[must_use]
pub fn local_day_id<Tz: TimeZone>(instant: &DateTime<Tz>) -> NaiveDate {
    instant.date_naive()
}

/// Today's local calendar day.
#[must_use]
pub fn today() -> NaiveDate {
    local_day_id(&Local::now())
}

#[must_use]
pub fn format_day_id(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

pub fn parse_day_id(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DAY_FORMAT)
        .with_context(|| format!("Invalid date '{s}'. Must be YYYY-MM-DD"))
}

/// Whole calendar days between two days, ignoring direction.
#[must_use]
pub fn days_apart(a: NaiveDate, b: NaiveDate) -> i64 {
    (a - b).num_days().abs()
}

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DayWindow {
    #[must_use]
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}

impl fmt::Display for DayWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} – {}",
            self.start.format(DAY_FORMAT),
            self.end.format(DAY_FORMAT)
        )
    }
}

/// Sunday-to-Saturday week containing `reference`.
#[must_use]
pub fn week_window(reference: NaiveDate) -> DayWindow {
    let offset = i64::from(reference.weekday().num_days_from_sunday());
    let start = reference - Duration::days(offset);
    DayWindow {
        start,
        end: start + Duration::days(6),
    }
}

/// The seven days immediately before `week_window(reference)`.
#[must_use]
pub fn previous_week_window(reference: NaiveDate) -> DayWindow {
    let current = week_window(reference);
    let start = current.start - Duration::days(7);
    DayWindow {
        start,
        end: start + Duration::days(6),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Weekday};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_window_midweek() {
        // 2024-06-12 is a Wednesday
        let w = week_window(day(2024, 6, 12));
        assert_eq!(w.start, day(2024, 6, 9));
        assert_eq!(w.end, day(2024, 6, 15));
        assert_eq!(w.start.weekday(), Weekday::Sun);
        assert_eq!(w.end.weekday(), Weekday::Sat);
    }

    #[test]
    fn test_week_window_on_sunday_starts_same_day() {
        let w = week_window(day(2024, 6, 9));
        assert_eq!(w.start, day(2024, 6, 9));
        assert_eq!(w.end, day(2024, 6, 15));
    }

    #[test]
    fn test_week_window_on_saturday_ends_same_day() {
        let w = week_window(day(2024, 6, 15));
        assert_eq!(w.start, day(2024, 6, 9));
        assert_eq!(w.end, day(2024, 6, 15));
    }

    #[test]
    fn test_week_window_crosses_year_boundary() {
        // 2025-01-01 is a Wednesday
        let w = week_window(day(2025, 1, 1));
        assert_eq!(w.start, day(2024, 12, 29));
        assert_eq!(w.end, day(2025, 1, 4));
    }

    #[test]
    fn test_previous_week_window() {
        let w = previous_week_window(day(2024, 6, 12));
        assert_eq!(w.start, day(2024, 6, 2));
        assert_eq!(w.end, day(2024, 6, 8));
    }

    #[test]
    fn test_window_contains_is_inclusive() {
        let w = week_window(day(2024, 6, 12));
        assert!(w.contains(day(2024, 6, 9)));
        assert!(w.contains(day(2024, 6, 15)));
        assert!(!w.contains(day(2024, 6, 8)));
        assert!(!w.contains(day(2024, 6, 16)));
    }

    #[test]
    fn test_week_window_spans_leap_day() {
        let w = week_window(day(2024, 2, 28));
        assert_eq!(w.start, day(2024, 2, 25));
        assert_eq!(w.end, day(2024, 3, 2));
        assert!(w.contains(day(2024, 2, 29)));
    }

    #[test]
    fn test_local_day_id_uses_instant_offset_not_utc() {
        // 22:00 at UTC-5 is already 03:00 the next day in UTC
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        let evening = tz.with_ymd_and_hms(2024, 6, 15, 22, 0, 0).unwrap();
        assert_eq!(local_day_id(&evening), day(2024, 6, 15));

        // 01:00 at UTC+3 is still the previous day in UTC
        let tz = FixedOffset::east_opt(3 * 3600).unwrap();
        let early = tz.with_ymd_and_hms(2024, 6, 16, 1, 0, 0).unwrap();
        assert_eq!(local_day_id(&early), day(2024, 6, 16));
    }

    #[test]
    fn test_format_and_parse_day_id() {
        assert_eq!(format_day_id(day(2024, 1, 5)), "2024-01-05");
        assert_eq!(parse_day_id("2024-01-05").unwrap(), day(2024, 1, 5));
        assert_eq!(parse_day_id(" 2024-01-05 ").unwrap(), day(2024, 1, 5));
        assert!(parse_day_id("05/01/2024").is_err());
        assert!(parse_day_id("2024-02-30").is_err());
    }

    #[test]
    fn test_day_id_strings_sort_chronologically() {
        let days = [day(2023, 12, 31), day(2024, 1, 9), day(2024, 1, 10)];
        let ids: Vec<String> = days.iter().map(|d| format_day_id(*d)).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn test_days_apart() {
        assert_eq!(days_apart(day(2024, 3, 1), day(2024, 2, 28)), 2);
        assert_eq!(days_apart(day(2024, 2, 28), day(2024, 3, 1)), 2);
        assert_eq!(days_apart(day(2024, 3, 1), day(2024, 3, 1)), 0);
    }
}
