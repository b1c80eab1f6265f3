//! Data models
//!
//! Rust structs representing persisted entities. All models use serde
//! for serialization; the same JSON shape serves the local snapshot
//! buckets and the per-id remote documents.

use crate::config::DAYS_PER_WEEK;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A persisted entity: knows its collection bucket name and its id.
///
/// The bucket name doubles as the remote collection name.
pub trait Entity: Serialize + for<'de> Deserialize<'de> + Clone + Send + Sync + 'static {
    const BUCKET: &'static str;

    fn id(&self) -> &str;
}

/// A client project that time can be booked against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub client_name: String,
    /// Display color token, e.g. "emerald"
    pub color: String,
}

impl Entity for Project {
    const BUCKET: &'static str = "projects";

    fn id(&self) -> &str {
        &self.id
    }
}

/// A task within a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub name: String,
    pub project_id: String,
}

impl Entity for Task {
    const BUCKET: &'static str = "tasks";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Start/end clock times for one day of one entry, "HH:MM" strings.
/// Either side may be empty while the user is still filling the cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayTime {
    pub start: String,
    pub end: String,
}

impl DayTime {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_empty() && self.end.is_empty()
    }
}

/// Billing classification of a time entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BillingStatus {
    Billable,
    NonBillable,
}

/// One project/task allocation within a timesheet, with up to seven
/// per-day time ranges.
///
/// Invariant: `hours[i]` is always the value derived from
/// `daily_times[i]`; the two never diverge. An entry occupying no day
/// at all is considered deleted and is pruned by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntry {
    pub id: String,
    pub project_id: String,
    pub task_id: String,
    pub hours: [f64; DAYS_PER_WEEK],
    pub daily_times: [DayTime; DAYS_PER_WEEK],
    pub notes: String,
    pub billing_status: BillingStatus,
}

impl TimeEntry {
    /// Seven empty per-day time ranges.
    pub fn empty_daily_times() -> [DayTime; DAYS_PER_WEEK] {
        std::array::from_fn(|_| DayTime::default())
    }

    /// Whether this entry has any recorded time or a partially filled
    /// time range on the given day.
    pub fn occupies_day(&self, day: usize) -> bool {
        self.hours[day] > 0.0 || !self.daily_times[day].is_empty()
    }

    /// An entry occupying no day is dead weight and gets pruned.
    pub fn is_blank(&self) -> bool {
        (0..DAYS_PER_WEEK).all(|day| !self.occupies_day(day))
    }
}

/// Approval workflow state of a timesheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimesheetStatus {
    Draft,
    Submitted,
    Approved,
    Rejected,
}

/// One user's hour record for a single Monday-start week.
///
/// Exactly one timesheet exists per (user, week start) pair; the
/// application shell creates missing weeks lazily.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timesheet {
    pub id: String,
    pub user_id: String,
    /// Always a Monday, serialized as "YYYY-MM-DD"
    pub week_start_date: NaiveDate,
    pub status: TimesheetStatus,
    pub entries: Vec<TimeEntry>,
    /// Cached sum over all entries and days; recomputed on every
    /// mutation, never hand-edited.
    pub total_hours: f64,
}

impl Entity for Timesheet {
    const BUCKET: &'static str = "timesheets";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Category of a leave booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeOffType {
    AnnualLeave,
    SickLeave,
    Other,
}

/// Approval state of a leave booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeOffStatus {
    Pending,
    Approved,
    Rejected,
}

/// A leave booking spanning one or more calendar days.
///
/// Immutable once created, except for status transitions performed by
/// an approver. `start_date <= end_date` is enforced at the service
/// boundary before construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeOffRequest {
    pub id: String,
    pub user_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    #[serde(rename = "type")]
    pub kind: TimeOffType,
    pub reason: String,
    pub status: TimeOffStatus,
    /// Opaque evidence blob (e.g. a doctor's note), base64 on the wire
    #[serde(default, with = "base64_blob", skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment_name: Option<String>,
}

impl TimeOffRequest {
    /// Inclusive overlap check against another calendar range.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start_date <= end && self.end_date >= start
    }

    /// Whether the booking covers the given calendar day.
    pub fn covers(&self, day: NaiveDate) -> bool {
        self.overlaps(day, day)
    }
}

impl Entity for TimeOffRequest {
    const BUCKET: &'static str = "time_off_requests";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Built-in seed used when a collection has never been written (fresh
/// local cache, or an empty remote collection): one catch-all project
/// with a handful of tasks so the grid always has a booking target.
pub fn default_projects() -> Vec<Project> {
    vec![Project {
        id: "prj-general".to_string(),
        name: "General".to_string(),
        client_name: "Internal".to_string(),
        color: "slate".to_string(),
    }]
}

/// Seed tasks matching [`default_projects`]. "Lunch break" is picked
/// up by the break-entry task heuristic.
pub fn default_tasks() -> Vec<Task> {
    vec![
        Task {
            id: "tsk-development".to_string(),
            name: "Development".to_string(),
            project_id: "prj-general".to_string(),
        },
        Task {
            id: "tsk-meetings".to_string(),
            name: "Meetings".to_string(),
            project_id: "prj-general".to_string(),
        },
        Task {
            id: "tsk-lunch".to_string(),
            name: "Lunch break".to_string(),
            project_id: "prj-general".to_string(),
        },
    ]
}

/// Serde adapter storing an optional byte blob as base64 text.
mod base64_blob {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(blob: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match blob {
            Some(bytes) => serializer.serialize_some(&STANDARD.encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded: Option<String> = Option::deserialize(deserializer)?;
        match encoded {
            Some(text) => STANDARD
                .decode(text.as_bytes())
                .map(Some)
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}
