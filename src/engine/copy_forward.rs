//! Copy-forward resolver
//!
//! Finds a previous week whose entries can be duplicated into the
//! active week. The exact previous week wins; failing that, the most
//! recent earlier week is used. Copies always get fresh ids so the two
//! weeks stay independently editable.

use super::entries::week_total;
use crate::clock::add_days;
use crate::database::models::{TimeEntry, Timesheet};
use chrono::NaiveDate;
use uuid::Uuid;

/// The entry list and total that result from appending a source week
/// onto the active week.
#[derive(Debug, Clone)]
pub struct CopiedWeek {
    pub entries: Vec<TimeEntry>,
    pub total_hours: f64,
}

/// Locate the source timesheet to copy from, if any.
///
/// Only the given user's sheets are considered. Step one looks for the
/// exact week seven days back; step two falls back to the most recent
/// sheet strictly before the active week.
pub fn find_source<'a>(
    timesheets: &'a [Timesheet],
    user_id: &str,
    active_week_start: NaiveDate,
) -> Option<&'a Timesheet> {
    let mine: Vec<&Timesheet> = timesheets
        .iter()
        .filter(|sheet| sheet.user_id == user_id)
        .collect();

    let previous_week = add_days(active_week_start, -7);
    if let Some(exact) = mine
        .iter()
        .find(|sheet| sheet.week_start_date == previous_week)
    {
        return Some(exact);
    }

    mine.into_iter()
        .filter(|sheet| sheet.week_start_date < active_week_start)
        .max_by_key(|sheet| sheet.week_start_date)
}

/// Append copies of the source week's entries onto the active week.
///
/// Returns `None` when there is nothing to copy (no source, or a
/// source without entries) — a no-op for the caller, not an error.
pub fn copy_forward(active: &Timesheet, source: &Timesheet) -> Option<CopiedWeek> {
    if source.entries.is_empty() {
        return None;
    }

    let mut entries = active.entries.clone();
    entries.extend(source.entries.iter().map(|entry| TimeEntry {
        id: Uuid::new_v4().to_string(),
        ..entry.clone()
    }));

    let total_hours = week_total(&entries);

    Some(CopiedWeek {
        entries,
        total_hours,
    })
}

/// One-shot resolution: find a source for the active sheet and copy it.
pub fn resolve(active: &Timesheet, timesheets: &[Timesheet]) -> Option<CopiedWeek> {
    let source = find_source(timesheets, &active.user_id, active.week_start_date)?;
    copy_forward(active, source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DAYS_PER_WEEK;
    use crate::database::models::{BillingStatus, DayTime, TimeEntry, TimesheetStatus};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(id: &str, day: usize, hours: f64) -> TimeEntry {
        let mut per_day = [0.0; DAYS_PER_WEEK];
        per_day[day] = hours;
        let mut daily_times = TimeEntry::empty_daily_times();
        daily_times[day] = DayTime::new("09:00", "17:00");
        TimeEntry {
            id: id.to_string(),
            project_id: "p1".to_string(),
            task_id: "t1".to_string(),
            hours: per_day,
            daily_times,
            notes: String::new(),
            billing_status: BillingStatus::Billable,
        }
    }

    fn sheet(id: &str, user: &str, week_start: NaiveDate, entries: Vec<TimeEntry>) -> Timesheet {
        let total_hours = week_total(&entries);
        Timesheet {
            id: id.to_string(),
            user_id: user.to_string(),
            week_start_date: week_start,
            status: TimesheetStatus::Draft,
            entries,
            total_hours,
        }
    }

    #[test]
    fn test_exact_previous_week_wins() {
        let sheets = vec![
            sheet("old", "u1", date(2024, 1, 1), vec![entry("a", 0, 4.0)]),
            sheet("prev", "u1", date(2024, 1, 8), vec![entry("b", 1, 6.0)]),
        ];

        let found = find_source(&sheets, "u1", date(2024, 1, 15)).unwrap();
        assert_eq!(found.id, "prev");
    }

    #[test]
    fn test_fallback_to_most_recent_earlier_week() {
        let sheets = vec![
            sheet("older", "u1", date(2023, 12, 4), vec![entry("a", 0, 4.0)]),
            sheet("newer", "u1", date(2023, 12, 18), vec![entry("b", 1, 6.0)]),
        ];

        // No sheet exactly one week back from 2024-01-15
        let found = find_source(&sheets, "u1", date(2024, 1, 15)).unwrap();
        assert_eq!(found.id, "newer");
    }

    #[test]
    fn test_other_users_and_future_weeks_are_ignored() {
        let sheets = vec![
            sheet("theirs", "u2", date(2024, 1, 8), vec![entry("a", 0, 4.0)]),
            sheet("future", "u1", date(2024, 2, 5), vec![entry("b", 1, 6.0)]),
        ];

        assert!(find_source(&sheets, "u1", date(2024, 1, 15)).is_none());
    }

    #[test]
    fn test_copy_appends_with_fresh_ids_and_summed_total() {
        let active = sheet(
            "active",
            "u1",
            date(2024, 1, 15),
            vec![entry("mine", 0, 3.0)],
        );
        let source = sheet(
            "prev",
            "u1",
            date(2024, 1, 8),
            vec![entry("src1", 1, 6.0), entry("src2", 2, 2.5)],
        );

        let copied = copy_forward(&active, &source).unwrap();

        assert_eq!(copied.entries.len(), 3);
        assert_eq!(copied.total_hours, 11.5);
        // Existing entries survive untouched
        assert_eq!(copied.entries[0].id, "mine");
        // Copies never reuse the source ids
        for original in &source.entries {
            assert!(copied.entries.iter().all(|e| e.id != original.id));
        }
        assert_eq!(copied.entries[1].hours, source.entries[0].hours);
    }

    #[test]
    fn test_empty_source_is_nothing_to_copy() {
        let active = sheet("active", "u1", date(2024, 1, 15), vec![entry("mine", 0, 3.0)]);
        let source = sheet("prev", "u1", date(2024, 1, 8), Vec::new());

        assert!(copy_forward(&active, &source).is_none());
        assert!(resolve(&active, &[source]).is_none());
    }
}
