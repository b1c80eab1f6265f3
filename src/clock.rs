//! Week clock
//!
//! Pure calendar-date arithmetic for the weekly grid: week-start
//! normalization, day offsets and week enumeration. Dates are
//! `NaiveDate` values — plain calendar days with no time-of-day or
//! timezone component, so daylight-saving shifts cannot drift them.

use crate::config::DAYS_PER_WEEK;
use chrono::{Datelike, Days, NaiveDate};

/// Add (or subtract, for negative `n`) whole calendar days.
pub fn add_days(date: NaiveDate, n: i64) -> NaiveDate {
    if n >= 0 {
        date.checked_add_days(Days::new(n as u64))
    } else {
        date.checked_sub_days(Days::new(n.unsigned_abs()))
    }
    // NaiveDate covers roughly +/- 262_000 years; week navigation
    // cannot leave that range.
    .unwrap_or(date)
}

/// Return the Monday on or before `date`.
///
/// Weekday is indexed with Sunday = 0: a Sunday normalizes six days
/// back, any other day normalizes `weekday - 1` days back. Idempotent,
/// and the result is always a Monday.
pub fn normalize_to_week_start(date: NaiveDate) -> NaiveDate {
    let weekday = date.weekday().num_days_from_sunday() as i64;
    let back = if weekday == 0 { 6 } else { weekday - 1 };
    add_days(date, -back)
}

/// The seven dates of the week starting at `week_start`, Monday
/// through Sunday in order.
pub fn week_dates(week_start: NaiveDate) -> Vec<NaiveDate> {
    (0..DAYS_PER_WEEK as i64)
        .map(|offset| add_days(week_start, offset))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_add_days_forward_and_back() {
        assert_eq!(add_days(date(2024, 2, 28), 1), date(2024, 2, 29));
        assert_eq!(add_days(date(2024, 3, 1), -1), date(2024, 2, 29));
        assert_eq!(add_days(date(2023, 12, 31), 1), date(2024, 1, 1));
    }

    #[test]
    fn test_normalize_monday_is_fixed_point() {
        let monday = date(2024, 1, 1);
        assert_eq!(monday.weekday(), Weekday::Mon);
        assert_eq!(normalize_to_week_start(monday), monday);
    }

    #[test]
    fn test_normalize_sunday_goes_six_days_back() {
        // Sunday 2024-01-07 belongs to the week of Monday 2024-01-01
        assert_eq!(normalize_to_week_start(date(2024, 1, 7)), date(2024, 1, 1));
    }

    #[test]
    fn test_normalize_midweek() {
        assert_eq!(normalize_to_week_start(date(2024, 1, 4)), date(2024, 1, 1));
        assert_eq!(normalize_to_week_start(date(2024, 1, 6)), date(2024, 1, 1));
    }

    #[test]
    fn test_normalize_is_idempotent_and_always_monday() {
        // Sweep a couple of years of days
        let mut d = date(2023, 1, 1);
        let end = date(2025, 1, 1);
        while d < end {
            let start = normalize_to_week_start(d);
            assert_eq!(start.weekday(), Weekday::Mon, "not a Monday for {}", d);
            assert_eq!(normalize_to_week_start(start), start);
            assert!(start <= d);
            d = add_days(d, 1);
        }
    }

    #[test]
    fn test_week_dates_monday_through_sunday() {
        let days = week_dates(date(2024, 1, 1));
        assert_eq!(days.len(), 7);
        assert_eq!(days[0], date(2024, 1, 1));
        assert_eq!(days[6], date(2024, 1, 7));
        assert_eq!(days[0].weekday(), Weekday::Mon);
        assert_eq!(days[6].weekday(), Weekday::Sun);
    }
}
