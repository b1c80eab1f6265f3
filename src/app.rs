//! Application state and controller
//!
//! One controller owns the whole in-memory state. Every mutation swaps
//! a whole collection value, so a concurrent render never observes a
//! partially applied change. Persistence is optimistic: state updates
//! first, the gateway mirrors it without blocking the caller.

use crate::config::AUTH_BOOTSTRAP_TIMEOUT_MS;
use crate::database::models::{Project, Task, TimeOffRequest, Timesheet, TimeOffStatus, TimesheetStatus};
use crate::error::Result;
use crate::gateway::{DataSnapshot, PersistenceGateway};
use crate::services::{ProjectsService, TimeOffService, TimesheetsService};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

/// The authenticated user, as resolved by the external identity
/// provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSession {
    pub user_id: String,
    pub display_name: String,
}

/// Task mutations arriving from the UI, dispatched through one
/// exhaustive handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum TaskAction {
    Add { name: String, project_id: String },
    Delete { id: String },
}

/// All in-memory collections for one session
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub session: Option<UserSession>,
    pub projects: Vec<Project>,
    pub tasks: Vec<Task>,
    pub timesheets: Vec<Timesheet>,
    pub time_off_requests: Vec<TimeOffRequest>,
}

/// Race the identity provider against the bootstrap deadline.
///
/// If the check has not resolved within the deadline, or resolves with
/// an error, the application proceeds as unauthenticated rather than
/// hanging on startup.
pub async fn resolve_session<F>(identity: F) -> Option<UserSession>
where
    F: Future<Output = anyhow::Result<Option<UserSession>>>,
{
    let deadline = Duration::from_millis(AUTH_BOOTSTRAP_TIMEOUT_MS);

    match tokio::time::timeout(deadline, identity).await {
        Ok(Ok(session)) => session,
        Ok(Err(error)) => {
            tracing::warn!("Identity check failed, continuing unauthenticated: {}", error);
            None
        }
        Err(_) => {
            tracing::warn!(
                "Identity check missed the {}ms deadline, continuing unauthenticated",
                AUTH_BOOTSTRAP_TIMEOUT_MS
            );
            None
        }
    }
}

/// Central controller owning state and services
pub struct AppController {
    pub state: AppState,
    projects_service: ProjectsService,
    timesheets_service: TimesheetsService,
    timeoff_service: TimeOffService,
}

impl AppController {
    /// Load the full data set and build the controller.
    pub async fn initialize(
        gateway: PersistenceGateway,
        session: Option<UserSession>,
    ) -> Result<Self> {
        let DataSnapshot {
            projects,
            tasks,
            timesheets,
            time_off_requests,
        } = gateway.load_all().await?;

        tracing::info!(
            "Application initialized ({})",
            session
                .as_ref()
                .map(|s| s.user_id.as_str())
                .unwrap_or("unauthenticated")
        );

        Ok(Self {
            state: AppState {
                session,
                projects,
                tasks,
                timesheets,
                time_off_requests,
            },
            projects_service: ProjectsService::new(gateway.clone()),
            timesheets_service: TimesheetsService::new(gateway.clone()),
            timeoff_service: TimeOffService::new(gateway),
        })
    }

    /// Make sure the signed-in user has a timesheet for the week of
    /// `today`, creating an empty Draft if needed. Unauthenticated
    /// sessions have no active week.
    pub async fn activate_week(&mut self, today: NaiveDate) -> Result<Option<String>> {
        let Some(session) = self.state.session.clone() else {
            return Ok(None);
        };

        let (timesheets, active_id) = self
            .timesheets_service
            .ensure_week(&self.state.timesheets, &session.user_id, today)
            .await?;
        self.state.timesheets = timesheets;
        Ok(Some(active_id))
    }

    /// Derived view: the signed-in user's sheet for the week of `today`.
    pub fn active_timesheet(&self, today: NaiveDate) -> Option<&Timesheet> {
        let session = self.state.session.as_ref()?;
        let week_start = crate::clock::normalize_to_week_start(today);
        self.state
            .timesheets
            .iter()
            .find(|sheet| sheet.user_id == session.user_id && sheet.week_start_date == week_start)
    }

    /// Derived view: timesheets waiting for an approver.
    pub fn pending_timesheets(&self) -> Vec<&Timesheet> {
        self.state
            .timesheets
            .iter()
            .filter(|sheet| sheet.status == TimesheetStatus::Submitted)
            .collect()
    }

    /// Derived view: leave requests waiting for an approver.
    pub fn pending_time_off(&self) -> Vec<&TimeOffRequest> {
        self.state
            .time_off_requests
            .iter()
            .filter(|request| request.status == TimeOffStatus::Pending)
            .collect()
    }

    /// Dispatch a task action. The match is exhaustive: adding a
    /// variant without handling it will not compile.
    pub async fn handle_task_action(&mut self, action: TaskAction) -> Result<()> {
        match action {
            TaskAction::Add { name, project_id } => {
                self.state.tasks = self
                    .projects_service
                    .add_task(&self.state.tasks, &self.state.projects, &name, &project_id)
                    .await?;
            }
            TaskAction::Delete { id } => {
                self.state.tasks = self
                    .projects_service
                    .delete_task(&self.state.tasks, &id)
                    .await?;
            }
        }
        Ok(())
    }

    /// Delete a project and its tasks in one whole-state replacement.
    pub async fn delete_project(&mut self, id: &str) -> Result<()> {
        let (projects, tasks) = self
            .projects_service
            .delete_project(&self.state.projects, &self.state.tasks, id)
            .await?;
        self.state.projects = projects;
        self.state.tasks = tasks;
        Ok(())
    }

    pub fn projects(&self) -> &ProjectsService {
        &self.projects_service
    }

    pub fn timesheets(&self) -> &TimesheetsService {
        &self.timesheets_service
    }

    pub fn time_off(&self) -> &TimeOffService {
        &self.timeoff_service
    }
}
