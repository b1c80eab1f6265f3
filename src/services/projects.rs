//! Projects service
//!
//! Project and task lifecycle. All operations take the current
//! collections and return fresh ones, so the shell can swap whole
//! values; the gateway is mirrored as part of each call.
//!
//! Deleting a project cascades over its tasks through an explicit
//! policy function. Time entries referencing a removed task are left
//! orphaned on purpose; repairing them is a UI concern.

use crate::config::MAX_NAME_LENGTH;
use crate::database::models::{Project, Task};
use crate::error::{AppError, Result};
use crate::gateway::PersistenceGateway;
use uuid::Uuid;

/// The dependent deletions removing a project entails: ids of every
/// task belonging to it. Pure; computed once, then applied.
pub fn cascade_for_project(project_id: &str, tasks: &[Task]) -> Vec<String> {
    tasks
        .iter()
        .filter(|task| task.project_id == project_id)
        .map(|task| task.id.clone())
        .collect()
}

fn validate_name(value: &str, field: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{} must not be empty", field)));
    }
    if trimmed.len() > MAX_NAME_LENGTH {
        return Err(AppError::Validation(format!(
            "{} exceeds {} characters",
            field, MAX_NAME_LENGTH
        )));
    }
    Ok(trimmed.to_string())
}

/// Service for managing projects and tasks
#[derive(Clone)]
pub struct ProjectsService {
    gateway: PersistenceGateway,
}

impl ProjectsService {
    pub fn new(gateway: PersistenceGateway) -> Self {
        Self { gateway }
    }

    /// Create a project and append it to the collection.
    pub async fn create_project(
        &self,
        projects: &[Project],
        name: &str,
        client_name: &str,
        color: &str,
    ) -> Result<Vec<Project>> {
        let project = Project {
            id: Uuid::new_v4().to_string(),
            name: validate_name(name, "Project name")?,
            client_name: validate_name(client_name, "Client name")?,
            color: color.to_string(),
        };

        tracing::info!("Creating project '{}' ({})", project.name, project.id);
        self.gateway.save(&project).await?;

        let mut result = projects.to_vec();
        result.push(project);
        Ok(result)
    }

    /// Create a task under an existing project.
    pub async fn add_task(
        &self,
        tasks: &[Task],
        projects: &[Project],
        name: &str,
        project_id: &str,
    ) -> Result<Vec<Task>> {
        if !projects.iter().any(|project| project.id == project_id) {
            return Err(AppError::ProjectNotFound(project_id.to_string()));
        }

        let task = Task {
            id: Uuid::new_v4().to_string(),
            name: validate_name(name, "Task name")?,
            project_id: project_id.to_string(),
        };

        tracing::info!("Creating task '{}' under project {}", task.name, project_id);
        self.gateway.save(&task).await?;

        let mut result = tasks.to_vec();
        result.push(task);
        Ok(result)
    }

    /// Delete a task.
    pub async fn delete_task(&self, tasks: &[Task], id: &str) -> Result<Vec<Task>> {
        tracing::info!("Deleting task {}", id);
        self.gateway.delete::<Task>(id).await?;

        Ok(tasks
            .iter()
            .filter(|task| task.id != id)
            .cloned()
            .collect())
    }

    /// Delete a project and, via the cascade policy, all of its tasks.
    ///
    /// The in-memory collections are replaced in one step; the gateway
    /// mirrors each deletion afterwards (no cross-entity transaction
    /// exists, by design).
    pub async fn delete_project(
        &self,
        projects: &[Project],
        tasks: &[Task],
        id: &str,
    ) -> Result<(Vec<Project>, Vec<Task>)> {
        if !projects.iter().any(|project| project.id == id) {
            return Err(AppError::ProjectNotFound(id.to_string()));
        }

        let doomed_tasks = cascade_for_project(id, tasks);
        tracing::info!(
            "Deleting project {} and {} dependent tasks",
            id,
            doomed_tasks.len()
        );

        let remaining_projects: Vec<Project> = projects
            .iter()
            .filter(|project| project.id != id)
            .cloned()
            .collect();
        let remaining_tasks: Vec<Task> = tasks
            .iter()
            .filter(|task| !doomed_tasks.contains(&task.id))
            .cloned()
            .collect();

        self.gateway.delete::<Project>(id).await?;
        for task_id in &doomed_tasks {
            self.gateway.delete::<Task>(task_id).await?;
        }

        Ok((remaining_projects, remaining_tasks))
    }
}
