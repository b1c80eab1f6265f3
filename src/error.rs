//! Error types for the timegrid engine
//!
//! All errors use thiserror for structured error handling.
//! These errors can be serialized to the frontend.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Remote request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Timesheet not found: {0}")]
    TimesheetNotFound(String),

    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("Time-off request not found: {0}")]
    TimeOffNotFound(String),

    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    #[error("Invalid status transition: {0}")]
    InvalidTransition(String),

    #[error("{0}")]
    Generic(String),
}

impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_serialize_as_plain_messages() {
        let error = AppError::Validation("start date is after end date".to_string());
        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(json, "Validation error: start date is after end date");

        let error = AppError::TimesheetNotFound("ts-1".to_string());
        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(json, "Timesheet not found: ts-1");
    }
}
