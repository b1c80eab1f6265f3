//! Application configuration constants
//!
//! Central location for all configuration constants, resource limits,
//! and validation boundaries used throughout the engine.

// ===== Week Grid =====

/// Number of days in a timesheet week (Monday through Sunday)
pub const DAYS_PER_WEEK: usize = 7;

/// Default start time for a new work block
pub const DEFAULT_WORK_START: &str = "09:00";
/// Default end time for a new work block
pub const DEFAULT_WORK_END: &str = "17:00";

/// Default start time for a new break block
pub const DEFAULT_BREAK_START: &str = "12:00";
/// Default end time for a new break block
pub const DEFAULT_BREAK_END: &str = "13:00";

/// Task-name fragments that mark a task as a break/meal task.
/// Used when defaulting the task of a newly added break entry.
pub const BREAK_TASK_HINTS: &[&str] = &["meal", "break", "lunch"];

// ===== Validation Limits =====

/// Maximum length for project and client names
pub const MAX_NAME_LENGTH: usize = 120;

/// Maximum length for time-off request reasons and entry notes
pub const MAX_TEXT_LENGTH: usize = 2_000;

// ===== Session Bootstrap =====

/// Hard deadline for the identity check at startup, in milliseconds.
/// If the identity provider has not resolved by then, the application
/// proceeds as unauthenticated instead of hanging.
pub const AUTH_BOOTSTRAP_TIMEOUT_MS: u64 = 4_000;

// ===== Remote Store =====

/// Environment variable naming the remote store base URL.
/// Unset means the engine runs local-only.
pub const REMOTE_URL_ENV: &str = "TIMEGRID_REMOTE_URL";

/// Environment variable holding the remote store bearer token
pub const REMOTE_TOKEN_ENV: &str = "TIMEGRID_REMOTE_TOKEN";
