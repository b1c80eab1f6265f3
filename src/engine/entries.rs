//! Time entry engine
//!
//! Converts per-day start/end times into decimal hours, aggregates
//! totals, and maintains the entry list through grid edits. Every
//! function is pure: callers pass the current entry list in and get a
//! fresh list back.
//!
//! Malformed time strings never fail; they derive to zero hours.

use crate::config::{
    BREAK_TASK_HINTS, DAYS_PER_WEEK, DEFAULT_BREAK_END, DEFAULT_BREAK_START, DEFAULT_WORK_END,
    DEFAULT_WORK_START,
};
use crate::database::models::{BillingStatus, DayTime, Project, Task, TimeEntry};
use uuid::Uuid;

/// What kind of block a newly added entry represents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Work,
    Break,
}

/// Parse "HH:MM" into minutes since midnight. Anything else is `None`.
fn parse_minutes(time: &str) -> Option<i64> {
    let (hours, minutes) = time.split_once(':')?;
    let hours: i64 = hours.parse().ok()?;
    let minutes: i64 = minutes.parse().ok()?;
    if !(0..24).contains(&hours) || !(0..60).contains(&minutes) {
        return None;
    }
    Some(hours * 60 + minutes)
}

/// Decimal hours between two clock times, rounded to two places.
///
/// An end before the start is treated as an overnight wrap and gains
/// 24 hours. Empty or malformed input yields 0.
pub fn derive_hours(start: &str, end: &str) -> f64 {
    let (Some(start_min), Some(end_min)) = (parse_minutes(start), parse_minutes(end)) else {
        return 0.0;
    };

    let mut diff = end_min - start_min;
    if diff < 0 {
        diff += 24 * 60;
    }

    (diff as f64 / 60.0 * 100.0).round() / 100.0
}

/// Sum of hours booked on one day across all entries.
pub fn day_total(entries: &[TimeEntry], day: usize) -> f64 {
    entries.iter().map(|entry| entry.hours[day]).sum()
}

/// Sum of hours across all entries and all seven days.
pub fn week_total(entries: &[TimeEntry]) -> f64 {
    entries
        .iter()
        .map(|entry| entry.hours.iter().sum::<f64>())
        .sum()
}

/// Pick the default project/task pair for a new entry.
///
/// Work entries default to the first project and its first task. Break
/// entries prefer a task whose name hints at a meal break, wherever it
/// lives; the entry then follows that task's project.
fn default_target(kind: EntryKind, projects: &[Project], tasks: &[Task]) -> (String, String) {
    if kind == EntryKind::Break {
        let hinted = tasks.iter().find(|task| {
            let name = task.name.to_lowercase();
            BREAK_TASK_HINTS.iter().any(|hint| name.contains(hint))
        });
        if let Some(task) = hinted {
            return (task.project_id.clone(), task.id.clone());
        }
    }

    let project_id = projects
        .first()
        .map(|project| project.id.clone())
        .unwrap_or_default();
    let task_id = tasks
        .iter()
        .find(|task| task.project_id == project_id)
        .map(|task| task.id.clone())
        .unwrap_or_default();
    (project_id, task_id)
}

/// Append a new entry with a default time block on a single day.
///
/// Work blocks default to 09:00–17:00, breaks to 12:00–13:00; every
/// other day starts empty.
pub fn add_entry_for_day(
    entries: &[TimeEntry],
    day: usize,
    kind: EntryKind,
    projects: &[Project],
    tasks: &[Task],
) -> Vec<TimeEntry> {
    let (project_id, task_id) = default_target(kind, projects, tasks);

    let block = match kind {
        EntryKind::Work => DayTime::new(DEFAULT_WORK_START, DEFAULT_WORK_END),
        EntryKind::Break => DayTime::new(DEFAULT_BREAK_START, DEFAULT_BREAK_END),
    };

    let mut hours = [0.0; DAYS_PER_WEEK];
    hours[day] = derive_hours(&block.start, &block.end);
    let mut daily_times = TimeEntry::empty_daily_times();
    daily_times[day] = block;

    let entry = TimeEntry {
        id: Uuid::new_v4().to_string(),
        project_id,
        task_id,
        hours,
        daily_times,
        notes: String::new(),
        billing_status: match kind {
            EntryKind::Work => BillingStatus::Billable,
            EntryKind::Break => BillingStatus::NonBillable,
        },
    };

    let mut result = entries.to_vec();
    result.push(entry);
    result
}

/// Set one day's time range on one entry, rederiving its hours.
///
/// Entries left with no occupied day are pruned from the result.
pub fn update_day_time(
    entries: &[TimeEntry],
    entry_id: &str,
    day: usize,
    times: DayTime,
) -> Vec<TimeEntry> {
    let mut result = entries.to_vec();

    if let Some(entry) = result.iter_mut().find(|entry| entry.id == entry_id) {
        entry.hours[day] = derive_hours(&times.start, &times.end);
        entry.daily_times[day] = times;
    }

    result.retain(|entry| !entry.is_blank());
    result
}

/// Blank one day of one entry, pruning the entry if nothing remains.
pub fn clear_day(entries: &[TimeEntry], entry_id: &str, day: usize) -> Vec<TimeEntry> {
    update_day_time(entries, entry_id, day, DayTime::default())
}

/// Move an entry to another project.
///
/// The task is reset to the first task of the new project (or cleared
/// when the project has none) so it can never dangle on the old one.
pub fn retarget_project(entry: &TimeEntry, new_project_id: &str, tasks: &[Task]) -> TimeEntry {
    let task_id = tasks
        .iter()
        .find(|task| task.project_id == new_project_id)
        .map(|task| task.id.clone())
        .unwrap_or_default();

    TimeEntry {
        project_id: new_project_id.to_string(),
        task_id,
        ..entry.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(id: &str) -> Project {
        Project {
            id: id.to_string(),
            name: format!("Project {}", id),
            client_name: "Acme".to_string(),
            color: "emerald".to_string(),
        }
    }

    fn task(id: &str, name: &str, project_id: &str) -> Task {
        Task {
            id: id.to_string(),
            name: name.to_string(),
            project_id: project_id.to_string(),
        }
    }

    fn entry_with_day(id: &str, day: usize, start: &str, end: &str) -> TimeEntry {
        let mut daily_times = TimeEntry::empty_daily_times();
        daily_times[day] = DayTime::new(start, end);
        let mut hours = [0.0; DAYS_PER_WEEK];
        hours[day] = derive_hours(start, end);
        TimeEntry {
            id: id.to_string(),
            project_id: "p1".to_string(),
            task_id: "t1".to_string(),
            hours,
            daily_times,
            notes: String::new(),
            billing_status: BillingStatus::Billable,
        }
    }

    #[test]
    fn test_derive_hours_standard_day() {
        assert_eq!(derive_hours("09:00", "17:00"), 8.00);
        assert_eq!(derive_hours("09:00", "09:30"), 0.50);
        assert_eq!(derive_hours("09:00", "09:20"), 0.33);
    }

    #[test]
    fn test_derive_hours_overnight_wrap() {
        assert_eq!(derive_hours("22:00", "06:00"), 8.00);
        assert_eq!(derive_hours("23:30", "00:15"), 0.75);
    }

    #[test]
    fn test_derive_hours_is_total_over_garbage() {
        assert_eq!(derive_hours("", "17:00"), 0.0);
        assert_eq!(derive_hours("09:00", ""), 0.0);
        assert_eq!(derive_hours("nine", "17:00"), 0.0);
        assert_eq!(derive_hours("25:00", "17:00"), 0.0);
        assert_eq!(derive_hours("09:61", "17:00"), 0.0);
        assert_eq!(derive_hours("09:00", "09:00"), 0.0);
    }

    #[test]
    fn test_week_total_equals_sum_of_day_totals() {
        let entries = vec![
            entry_with_day("e1", 0, "09:00", "17:00"),
            entry_with_day("e2", 0, "18:00", "20:00"),
            entry_with_day("e3", 4, "10:00", "16:30"),
        ];

        let by_days: f64 = (0..DAYS_PER_WEEK).map(|d| day_total(&entries, d)).sum();
        assert_eq!(week_total(&entries), by_days);
        assert_eq!(week_total(&entries), 16.5);
        // Multiple entries on the same day simply sum
        assert_eq!(day_total(&entries, 0), 10.0);
    }

    #[test]
    fn test_add_work_entry_defaults() {
        let projects = vec![project("p1"), project("p2")];
        let tasks = vec![task("t1", "Design", "p1"), task("t2", "Build", "p2")];

        let entries = add_entry_for_day(&[], 2, EntryKind::Work, &projects, &tasks);

        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.project_id, "p1");
        assert_eq!(entry.task_id, "t1");
        assert_eq!(entry.hours[2], 8.0);
        assert_eq!(entry.daily_times[2], DayTime::new("09:00", "17:00"));
        assert_eq!(entry.billing_status, BillingStatus::Billable);
        for day in (0..DAYS_PER_WEEK).filter(|&d| d != 2) {
            assert!(!entry.occupies_day(day));
        }
    }

    #[test]
    fn test_add_break_entry_prefers_meal_task() {
        let projects = vec![project("p1"), project("p2")];
        let tasks = vec![
            task("t1", "Design", "p1"),
            task("t2", "Lunch break", "p2"),
        ];

        let entries = add_entry_for_day(&[], 0, EntryKind::Break, &projects, &tasks);

        let entry = &entries[0];
        assert_eq!(entry.task_id, "t2");
        assert_eq!(entry.project_id, "p2");
        assert_eq!(entry.hours[0], 1.0);
        assert_eq!(entry.billing_status, BillingStatus::NonBillable);
    }

    #[test]
    fn test_clear_only_occupied_day_prunes_entry() {
        let entries = vec![entry_with_day("e1", 3, "09:00", "12:00")];

        let result = clear_day(&entries, "e1", 3);

        assert!(result.is_empty());
    }

    #[test]
    fn test_clear_one_of_several_days_keeps_entry() {
        let mut entry = entry_with_day("e1", 1, "09:00", "12:00");
        entry.daily_times[4] = DayTime::new("13:00", "17:00");
        entry.hours[4] = derive_hours("13:00", "17:00");

        let result = clear_day(&[entry], "e1", 1);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].hours[1], 0.0);
        assert!(result[0].daily_times[1].is_empty());
        assert_eq!(result[0].hours[4], 4.0);
    }

    #[test]
    fn test_update_day_time_keeps_hours_in_sync() {
        let entries = vec![entry_with_day("e1", 0, "09:00", "17:00")];

        let result = update_day_time(&entries, "e1", 0, DayTime::new("10:00", "15:30"));

        assert_eq!(result[0].hours[0], 5.5);
        assert_eq!(result[0].daily_times[0], DayTime::new("10:00", "15:30"));
    }

    #[test]
    fn test_retarget_project_resets_task() {
        let tasks = vec![task("t1", "Design", "p1"), task("t9", "Audit", "p9")];
        let entry = entry_with_day("e1", 0, "09:00", "17:00");

        let moved = retarget_project(&entry, "p9", &tasks);
        assert_eq!(moved.project_id, "p9");
        assert_eq!(moved.task_id, "t9");
        // Hours and times are untouched by a project change
        assert_eq!(moved.hours, entry.hours);
        assert_eq!(moved.daily_times, entry.daily_times);

        let orphaned = retarget_project(&entry, "p-empty", &tasks);
        assert_eq!(orphaned.task_id, "");
    }
}
