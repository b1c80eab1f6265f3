//! Timesheets service
//!
//! Week lifecycle and grid edits. Every mutation goes through the pure
//! entry engine, recomputes the cached week total, persists the sheet
//! optimistically, and hands back a fully replaced collection.
//!
//! Entries are editable while a sheet is Draft or Rejected; Submitted
//! and Approved sheets are frozen.

use crate::clock::normalize_to_week_start;
use crate::config::{DAYS_PER_WEEK, MAX_TEXT_LENGTH};
use crate::database::models::{
    BillingStatus, DayTime, Project, Task, TimeEntry, Timesheet, TimesheetStatus,
};
use crate::engine::copy_forward;
use crate::engine::entries::{self, EntryKind};
use crate::error::{AppError, Result};
use crate::gateway::PersistenceGateway;
use chrono::NaiveDate;
use uuid::Uuid;

/// Service for managing weekly timesheets
#[derive(Clone)]
pub struct TimesheetsService {
    gateway: PersistenceGateway,
}

impl TimesheetsService {
    pub fn new(gateway: PersistenceGateway) -> Self {
        Self { gateway }
    }

    /// Guarantee a timesheet exists for the user's current week.
    ///
    /// Returns the (possibly extended) collection and the id of the
    /// active sheet. A missing week is synthesized as an empty Draft
    /// and persisted immediately, which is what keeps the
    /// one-sheet-per-(user, week) invariant without an explicit
    /// "create week" action.
    pub async fn ensure_week(
        &self,
        timesheets: &[Timesheet],
        user_id: &str,
        today: NaiveDate,
    ) -> Result<(Vec<Timesheet>, String)> {
        let week_start = normalize_to_week_start(today);

        if let Some(existing) = timesheets
            .iter()
            .find(|sheet| sheet.user_id == user_id && sheet.week_start_date == week_start)
        {
            return Ok((timesheets.to_vec(), existing.id.clone()));
        }

        let sheet = Timesheet {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            week_start_date: week_start,
            status: TimesheetStatus::Draft,
            entries: Vec::new(),
            total_hours: 0.0,
        };

        tracing::info!(
            "Creating timesheet for user {} week {}",
            user_id,
            week_start
        );
        self.gateway.save(&sheet).await?;

        let id = sheet.id.clone();
        let mut result = timesheets.to_vec();
        result.push(sheet);
        Ok((result, id))
    }

    /// Add a defaulted work or break entry on one day.
    pub async fn add_entry(
        &self,
        timesheets: &[Timesheet],
        sheet_id: &str,
        day: usize,
        kind: EntryKind,
        projects: &[Project],
        tasks: &[Task],
    ) -> Result<Vec<Timesheet>> {
        validate_day(day)?;
        self.edit_entries(timesheets, sheet_id, |current| {
            entries::add_entry_for_day(current, day, kind, projects, tasks)
        })
        .await
    }

    /// Set one day's time range on one entry.
    pub async fn update_day_time(
        &self,
        timesheets: &[Timesheet],
        sheet_id: &str,
        entry_id: &str,
        day: usize,
        times: DayTime,
    ) -> Result<Vec<Timesheet>> {
        validate_day(day)?;
        self.edit_entries(timesheets, sheet_id, |current| {
            entries::update_day_time(current, entry_id, day, times.clone())
        })
        .await
    }

    /// Blank one day of one entry, pruning the entry if empty after.
    pub async fn clear_day(
        &self,
        timesheets: &[Timesheet],
        sheet_id: &str,
        entry_id: &str,
        day: usize,
    ) -> Result<Vec<Timesheet>> {
        validate_day(day)?;
        self.edit_entries(timesheets, sheet_id, |current| {
            entries::clear_day(current, entry_id, day)
        })
        .await
    }

    /// Move an entry to another project, resetting its task.
    pub async fn retarget_entry(
        &self,
        timesheets: &[Timesheet],
        sheet_id: &str,
        entry_id: &str,
        new_project_id: &str,
        tasks: &[Task],
    ) -> Result<Vec<Timesheet>> {
        self.edit_entry(timesheets, sheet_id, entry_id, |entry| {
            entries::retarget_project(entry, new_project_id, tasks)
        })
        .await
    }

    /// Change an entry's task within its current project.
    pub async fn set_entry_task(
        &self,
        timesheets: &[Timesheet],
        sheet_id: &str,
        entry_id: &str,
        task_id: &str,
    ) -> Result<Vec<Timesheet>> {
        self.edit_entry(timesheets, sheet_id, entry_id, |entry| TimeEntry {
            task_id: task_id.to_string(),
            ..entry.clone()
        })
        .await
    }

    /// Update an entry's notes. Never touches hours.
    pub async fn set_entry_notes(
        &self,
        timesheets: &[Timesheet],
        sheet_id: &str,
        entry_id: &str,
        notes: &str,
    ) -> Result<Vec<Timesheet>> {
        if notes.len() > MAX_TEXT_LENGTH {
            return Err(AppError::Validation(format!(
                "notes exceed {} characters",
                MAX_TEXT_LENGTH
            )));
        }
        self.edit_entry(timesheets, sheet_id, entry_id, |entry| TimeEntry {
            notes: notes.to_string(),
            ..entry.clone()
        })
        .await
    }

    /// Flip an entry's billing status. Never touches hours.
    pub async fn set_entry_billing(
        &self,
        timesheets: &[Timesheet],
        sheet_id: &str,
        entry_id: &str,
        billing_status: BillingStatus,
    ) -> Result<Vec<Timesheet>> {
        self.edit_entry(timesheets, sheet_id, entry_id, |entry| TimeEntry {
            billing_status,
            ..entry.clone()
        })
        .await
    }

    /// Append a previous week's entries onto the active sheet.
    ///
    /// Returns whether anything was copied; "nothing to copy" is a
    /// quiet no-op, not an error.
    pub async fn copy_forward(
        &self,
        timesheets: &[Timesheet],
        sheet_id: &str,
    ) -> Result<(Vec<Timesheet>, bool)> {
        let active = find_sheet(timesheets, sheet_id)?;
        ensure_editable(active)?;

        match copy_forward::resolve(active, timesheets) {
            Some(copied) => {
                let updated = Timesheet {
                    entries: copied.entries,
                    total_hours: copied.total_hours,
                    ..active.clone()
                };
                tracing::info!(
                    "Copied previous week into sheet {}: now {} entries, {} hours",
                    sheet_id,
                    updated.entries.len(),
                    updated.total_hours
                );
                self.gateway.save(&updated).await?;
                Ok((replace_sheet(timesheets, updated), true))
            }
            None => {
                tracing::info!("Nothing to copy into sheet {}", sheet_id);
                Ok((timesheets.to_vec(), false))
            }
        }
    }

    /// Submit a Draft or Rejected sheet for approval.
    pub async fn submit(
        &self,
        timesheets: &[Timesheet],
        sheet_id: &str,
    ) -> Result<Vec<Timesheet>> {
        self.transition(
            timesheets,
            sheet_id,
            &[TimesheetStatus::Draft, TimesheetStatus::Rejected],
            TimesheetStatus::Submitted,
        )
        .await
    }

    /// Approve a Submitted sheet.
    pub async fn approve(
        &self,
        timesheets: &[Timesheet],
        sheet_id: &str,
    ) -> Result<Vec<Timesheet>> {
        self.transition(
            timesheets,
            sheet_id,
            &[TimesheetStatus::Submitted],
            TimesheetStatus::Approved,
        )
        .await
    }

    /// Reject a Submitted sheet back to the user.
    pub async fn reject(
        &self,
        timesheets: &[Timesheet],
        sheet_id: &str,
    ) -> Result<Vec<Timesheet>> {
        self.transition(
            timesheets,
            sheet_id,
            &[TimesheetStatus::Submitted],
            TimesheetStatus::Rejected,
        )
        .await
    }

    async fn transition(
        &self,
        timesheets: &[Timesheet],
        sheet_id: &str,
        allowed_from: &[TimesheetStatus],
        to: TimesheetStatus,
    ) -> Result<Vec<Timesheet>> {
        let sheet = find_sheet(timesheets, sheet_id)?;

        if !allowed_from.contains(&sheet.status) {
            return Err(AppError::InvalidTransition(format!(
                "timesheet {} cannot move from {:?} to {:?}",
                sheet_id, sheet.status, to
            )));
        }

        let updated = Timesheet {
            status: to,
            ..sheet.clone()
        };
        tracing::info!("Timesheet {} -> {:?}", sheet_id, to);
        self.gateway.save(&updated).await?;

        Ok(replace_sheet(timesheets, updated))
    }

    /// Apply an entry-list rewrite to one sheet, recompute the cached
    /// total, persist, and replace the collection.
    async fn edit_entries(
        &self,
        timesheets: &[Timesheet],
        sheet_id: &str,
        rewrite: impl FnOnce(&[TimeEntry]) -> Vec<TimeEntry>,
    ) -> Result<Vec<Timesheet>> {
        let sheet = find_sheet(timesheets, sheet_id)?;
        ensure_editable(sheet)?;

        let new_entries = rewrite(&sheet.entries);
        let total_hours = entries::week_total(&new_entries);
        let updated = Timesheet {
            entries: new_entries,
            total_hours,
            ..sheet.clone()
        };

        self.gateway.save(&updated).await?;
        Ok(replace_sheet(timesheets, updated))
    }

    /// Apply a single-entry rewrite, keeping everything else intact.
    async fn edit_entry(
        &self,
        timesheets: &[Timesheet],
        sheet_id: &str,
        entry_id: &str,
        rewrite: impl Fn(&TimeEntry) -> TimeEntry,
    ) -> Result<Vec<Timesheet>> {
        let sheet = find_sheet(timesheets, sheet_id)?;
        if !sheet.entries.iter().any(|entry| entry.id == entry_id) {
            return Err(AppError::EntryNotFound(entry_id.to_string()));
        }

        self.edit_entries(timesheets, sheet_id, |current| {
            current
                .iter()
                .map(|entry| {
                    if entry.id == entry_id {
                        rewrite(entry)
                    } else {
                        entry.clone()
                    }
                })
                .collect()
        })
        .await
    }
}

/// Day indexes arrive from UI payloads; anything past the grid is a
/// validation error, not a panic.
fn validate_day(day: usize) -> Result<()> {
    if day >= DAYS_PER_WEEK {
        return Err(AppError::Validation(format!(
            "day index {} is outside the week (0..{})",
            day, DAYS_PER_WEEK
        )));
    }
    Ok(())
}

fn find_sheet<'a>(timesheets: &'a [Timesheet], sheet_id: &str) -> Result<&'a Timesheet> {
    timesheets
        .iter()
        .find(|sheet| sheet.id == sheet_id)
        .ok_or_else(|| AppError::TimesheetNotFound(sheet_id.to_string()))
}

fn ensure_editable(sheet: &Timesheet) -> Result<()> {
    match sheet.status {
        TimesheetStatus::Draft | TimesheetStatus::Rejected => Ok(()),
        status => Err(AppError::InvalidTransition(format!(
            "timesheet {} is {:?} and cannot be edited",
            sheet.id, status
        ))),
    }
}

fn replace_sheet(timesheets: &[Timesheet], updated: Timesheet) -> Vec<Timesheet> {
    timesheets
        .iter()
        .map(|sheet| {
            if sheet.id == updated.id {
                updated.clone()
            } else {
                sheet.clone()
            }
        })
        .collect()
}
