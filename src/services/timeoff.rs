//! Time-off service
//!
//! Leave request lifecycle: boundary validation, approval
//! transitions, and the per-user layout feed for the leave calendar.
//! Requests are immutable once created except for their status.

use crate::config::MAX_TEXT_LENGTH;
use crate::database::models::{TimeOffRequest, TimeOffStatus, TimeOffType};
use crate::engine::layout::{self, SlotMap};
use crate::error::{AppError, Result};
use crate::gateway::PersistenceGateway;
use chrono::NaiveDate;
use uuid::Uuid;

/// Everything needed to book leave. Validated before any entity is
/// constructed; no partial request ever exists.
#[derive(Debug, Clone)]
pub struct NewTimeOffRequest {
    pub user_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub kind: TimeOffType,
    pub reason: String,
    pub attachment: Option<Vec<u8>>,
    pub attachment_name: Option<String>,
}

/// Service for managing leave requests
#[derive(Clone)]
pub struct TimeOffService {
    gateway: PersistenceGateway,
}

impl TimeOffService {
    pub fn new(gateway: PersistenceGateway) -> Self {
        Self { gateway }
    }

    /// Validate and create a leave request.
    pub async fn create_request(
        &self,
        requests: &[TimeOffRequest],
        new: NewTimeOffRequest,
    ) -> Result<Vec<TimeOffRequest>> {
        if new.start_date > new.end_date {
            return Err(AppError::Validation(format!(
                "start date {} is after end date {}",
                new.start_date, new.end_date
            )));
        }
        if new.reason.len() > MAX_TEXT_LENGTH {
            return Err(AppError::Validation(format!(
                "reason exceeds {} characters",
                MAX_TEXT_LENGTH
            )));
        }
        if new.attachment.is_some()
            && new
                .attachment_name
                .as_deref()
                .map_or(true, |name| name.trim().is_empty())
        {
            return Err(AppError::Validation(
                "attachment requires a file name".to_string(),
            ));
        }

        let request = TimeOffRequest {
            id: Uuid::new_v4().to_string(),
            user_id: new.user_id,
            start_date: new.start_date,
            end_date: new.end_date,
            start_time: new.start_time,
            end_time: new.end_time,
            kind: new.kind,
            reason: new.reason,
            status: TimeOffStatus::Pending,
            attachment: new.attachment,
            attachment_name: new.attachment_name,
        };

        tracing::info!(
            "Creating time-off request {} for user {} ({} to {})",
            request.id,
            request.user_id,
            request.start_date,
            request.end_date
        );
        self.gateway.save(&request).await?;

        let mut result = requests.to_vec();
        result.push(request);
        Ok(result)
    }

    /// Approver action: grant a pending request.
    pub async fn approve(
        &self,
        requests: &[TimeOffRequest],
        id: &str,
    ) -> Result<Vec<TimeOffRequest>> {
        self.transition(requests, id, TimeOffStatus::Approved).await
    }

    /// Approver action: turn down a pending request.
    pub async fn reject(
        &self,
        requests: &[TimeOffRequest],
        id: &str,
    ) -> Result<Vec<TimeOffRequest>> {
        self.transition(requests, id, TimeOffStatus::Rejected).await
    }

    /// Withdraw a request entirely. Deletion is always explicit.
    pub async fn delete_request(
        &self,
        requests: &[TimeOffRequest],
        id: &str,
    ) -> Result<Vec<TimeOffRequest>> {
        tracing::info!("Deleting time-off request {}", id);
        self.gateway.delete::<TimeOffRequest>(id).await?;

        Ok(requests
            .iter()
            .filter(|request| request.id != id)
            .cloned()
            .collect())
    }

    /// Slot layout for one user's calendar. Only that user's requests
    /// are fed to the packing algorithm.
    pub fn layout_for_user(&self, requests: &[TimeOffRequest], user_id: &str) -> SlotMap {
        layout::assign_slots_for_user(requests, user_id)
    }

    /// The requests awaiting an approver's decision.
    pub fn pending<'a>(&self, requests: &'a [TimeOffRequest]) -> Vec<&'a TimeOffRequest> {
        requests
            .iter()
            .filter(|request| request.status == TimeOffStatus::Pending)
            .collect()
    }

    async fn transition(
        &self,
        requests: &[TimeOffRequest],
        id: &str,
        to: TimeOffStatus,
    ) -> Result<Vec<TimeOffRequest>> {
        let request = requests
            .iter()
            .find(|request| request.id == id)
            .ok_or_else(|| AppError::TimeOffNotFound(id.to_string()))?;

        if request.status != TimeOffStatus::Pending {
            return Err(AppError::InvalidTransition(format!(
                "time-off request {} is already {:?}",
                id, request.status
            )));
        }

        let updated = TimeOffRequest {
            status: to,
            ..request.clone()
        };
        tracing::info!("Time-off request {} -> {:?}", id, to);
        self.gateway.save(&updated).await?;

        Ok(requests
            .iter()
            .map(|current| {
                if current.id == id {
                    updated.clone()
                } else {
                    current.clone()
                }
            })
            .collect())
    }
}
