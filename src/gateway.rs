//! Persistence gateway
//!
//! Dual-store persistence: a local cache that is always written first
//! and unconditionally, plus an optional remote store mirrored on a
//! best-effort basis. Remote writes run as detached tasks off the
//! caller's critical path; their failures surface as warning events,
//! never as errors. Local state wins on conflict.
//!
//! No cross-entity transactions exist. Cascading deletes are the
//! caller's responsibility; the gateway enforces no referential
//! integrity.

use crate::database::models::{
    default_projects, default_tasks, Entity, Project, Task, TimeOffRequest, Timesheet,
};
use crate::database::Repository;
use crate::error::Result;
use crate::remote::RemoteStore;
use serde::Serialize;
use tokio::sync::mpsc;

/// Non-fatal warnings raised when the remote mirror misbehaves.
/// Consumers surface these to the user; nothing is retried — the next
/// user-initiated write is the implicit retry.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GatewayEvent {
    RemoteSaveFailed {
        collection: &'static str,
        id: String,
        message: String,
    },
    RemoteDeleteFailed {
        collection: &'static str,
        id: String,
        message: String,
    },
    RemoteLoadFailed {
        message: String,
    },
}

/// Full data set for one session, one collection per entity kind.
#[derive(Debug, Clone, Default)]
pub struct DataSnapshot {
    pub projects: Vec<Project>,
    pub tasks: Vec<Task>,
    pub timesheets: Vec<Timesheet>,
    pub time_off_requests: Vec<TimeOffRequest>,
}

/// Gateway over the local cache and the optional remote mirror
#[derive(Clone)]
pub struct PersistenceGateway {
    repo: Repository,
    remote: Option<RemoteStore>,
    events: mpsc::UnboundedSender<GatewayEvent>,
}

impl PersistenceGateway {
    /// Build a gateway plus the receiver for its warning events.
    pub fn new(
        repo: Repository,
        remote: Option<RemoteStore>,
    ) -> (Self, mpsc::UnboundedReceiver<GatewayEvent>) {
        if remote.is_some() {
            tracing::info!("Persistence gateway running with remote mirror");
        } else {
            tracing::info!("Persistence gateway running local-only");
        }

        let (events, receiver) = mpsc::unbounded_channel();
        (
            Self {
                repo,
                remote,
                events,
            },
            receiver,
        )
    }

    fn emit(&self, event: GatewayEvent) {
        // A vanished consumer must not break persistence
        let _ = self.events.send(event);
    }

    /// Upsert one entity: local cache first, then a fire-and-forget
    /// remote mirror write.
    pub async fn save<T: Entity>(&self, entity: &T) -> Result<()> {
        self.repo.upsert(entity).await?;

        if let Some(remote) = self.remote.clone() {
            let entity = entity.clone();
            let gateway = self.clone();
            tokio::spawn(async move {
                if let Err(error) = remote.put(&entity).await {
                    tracing::warn!(
                        "Remote mirror of '{}' ({}) failed: {}",
                        entity.id(),
                        T::BUCKET,
                        error
                    );
                    gateway.emit(GatewayEvent::RemoteSaveFailed {
                        collection: T::BUCKET,
                        id: entity.id().to_string(),
                        message: error.to_string(),
                    });
                }
            });
        }

        Ok(())
    }

    /// Delete one entity by id, same local-first policy as `save`.
    pub async fn delete<T: Entity>(&self, id: &str) -> Result<()> {
        self.repo.delete::<T>(id).await?;

        if let Some(remote) = self.remote.clone() {
            let id = id.to_string();
            let gateway = self.clone();
            tokio::spawn(async move {
                if let Err(error) = remote.delete::<T>(&id).await {
                    tracing::warn!(
                        "Remote delete of '{}' ({}) failed: {}",
                        id,
                        T::BUCKET,
                        error
                    );
                    gateway.emit(GatewayEvent::RemoteDeleteFailed {
                        collection: T::BUCKET,
                        id,
                        message: error.to_string(),
                    });
                }
            });
        }

        Ok(())
    }

    /// Load every collection.
    ///
    /// A configured, reachable remote is authoritative for the
    /// session; a failing remote read downgrades to a warning plus a
    /// full local fallback. Collections never written anywhere fall
    /// back to the built-in seed.
    pub async fn load_all(&self) -> Result<DataSnapshot> {
        if let Some(remote) = &self.remote {
            match Self::load_remote(remote).await {
                Ok(snapshot) => {
                    tracing::info!(
                        "Loaded remote snapshot: {} projects, {} tasks, {} timesheets, {} requests",
                        snapshot.projects.len(),
                        snapshot.tasks.len(),
                        snapshot.timesheets.len(),
                        snapshot.time_off_requests.len()
                    );
                    return Ok(snapshot);
                }
                Err(error) => {
                    tracing::warn!("Remote load failed, falling back to local cache: {}", error);
                    self.emit(GatewayEvent::RemoteLoadFailed {
                        message: error.to_string(),
                    });
                }
            }
        }

        self.load_local().await
    }

    async fn load_remote(remote: &RemoteStore) -> Result<DataSnapshot> {
        let projects: Vec<Project> = remote.fetch_collection().await?;
        let tasks: Vec<Task> = remote.fetch_collection().await?;
        let timesheets: Vec<Timesheet> = remote.fetch_collection().await?;
        let time_off_requests: Vec<TimeOffRequest> = remote.fetch_collection().await?;

        // Empty remote collections fall back to the built-in seed
        Ok(DataSnapshot {
            projects: non_empty_or(projects, default_projects),
            tasks: non_empty_or(tasks, default_tasks),
            timesheets,
            time_off_requests,
        })
    }

    async fn load_local(&self) -> Result<DataSnapshot> {
        let snapshot = DataSnapshot {
            projects: self.repo.load().await?.unwrap_or_else(default_projects),
            tasks: self.repo.load().await?.unwrap_or_else(default_tasks),
            timesheets: self.repo.load().await?.unwrap_or_default(),
            time_off_requests: self.repo.load().await?.unwrap_or_default(),
        };

        tracing::info!(
            "Loaded local snapshot: {} projects, {} tasks, {} timesheets, {} requests",
            snapshot.projects.len(),
            snapshot.tasks.len(),
            snapshot.timesheets.len(),
            snapshot.time_off_requests.len()
        );

        Ok(snapshot)
    }
}

fn non_empty_or<T>(items: Vec<T>, fallback: fn() -> Vec<T>) -> Vec<T> {
    if items.is_empty() {
        fallback()
    } else {
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{initialize_database, Repository};
    use sqlx::sqlite::SqlitePoolOptions;

    async fn local_only_gateway() -> (PersistenceGateway, mpsc::UnboundedReceiver<GatewayEvent>) {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        initialize_database(&pool).await.unwrap();

        PersistenceGateway::new(Repository::new(pool), None)
    }

    fn project(id: &str, name: &str) -> Project {
        Project {
            id: id.to_string(),
            name: name.to_string(),
            client_name: "Acme".to_string(),
            color: "amber".to_string(),
        }
    }

    #[tokio::test]
    async fn test_fresh_store_serves_default_seed() {
        let (gateway, _events) = local_only_gateway().await;

        let snapshot = gateway.load_all().await.unwrap();

        assert_eq!(snapshot.projects.len(), 1);
        assert_eq!(snapshot.projects[0].name, "General");
        assert_eq!(snapshot.tasks.len(), 3);
        assert!(snapshot.timesheets.is_empty());
        assert!(snapshot.time_off_requests.is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load_round_trips_fields() {
        let (gateway, _events) = local_only_gateway().await;

        let saved = project("p1", "Website");
        gateway.save(&saved).await.unwrap();

        let snapshot = gateway.load_all().await.unwrap();
        assert_eq!(snapshot.projects.len(), 1);
        assert_eq!(snapshot.projects[0], saved);
    }

    #[tokio::test]
    async fn test_save_is_upsert_by_id() {
        let (gateway, _events) = local_only_gateway().await;

        gateway.save(&project("p1", "Website")).await.unwrap();
        gateway.save(&project("p1", "Website v2")).await.unwrap();

        let snapshot = gateway.load_all().await.unwrap();
        assert_eq!(snapshot.projects.len(), 1);
        assert_eq!(snapshot.projects[0].name, "Website v2");
    }

    #[tokio::test]
    async fn test_delete_excludes_id_from_load() {
        let (gateway, _events) = local_only_gateway().await;

        gateway.save(&project("p1", "Website")).await.unwrap();
        gateway.save(&project("p2", "Mobile")).await.unwrap();
        gateway.delete::<Project>("p1").await.unwrap();

        let snapshot = gateway.load_all().await.unwrap();
        assert_eq!(snapshot.projects.len(), 1);
        assert_eq!(snapshot.projects[0].id, "p2");
    }

    #[tokio::test]
    async fn test_explicitly_emptied_collection_stays_empty() {
        let (gateway, _events) = local_only_gateway().await;

        // Writing then deleting leaves an empty bucket, not a fresh one
        gateway.save(&project("p1", "Website")).await.unwrap();
        gateway.delete::<Project>("p1").await.unwrap();

        let snapshot = gateway.load_all().await.unwrap();
        assert!(snapshot.projects.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_remote_falls_back_to_local_with_warning() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        initialize_database(&pool).await.unwrap();

        let remote = crate::remote::RemoteStore::new(crate::remote::RemoteConfig {
            // Reserved TEST-NET address, nothing listens here
            base_url: "http://192.0.2.1:9".to_string(),
            token: None,
        })
        .unwrap();

        let (gateway, mut events) = PersistenceGateway::new(Repository::new(pool), Some(remote));

        gateway.save(&project("p1", "Website")).await.unwrap();

        let snapshot = gateway.load_all().await.unwrap();
        assert_eq!(snapshot.projects.len(), 1);
        assert_eq!(snapshot.projects[0].id, "p1");

        let event = events.recv().await.unwrap();
        assert!(matches!(
            event,
            GatewayEvent::RemoteLoadFailed { .. } | GatewayEvent::RemoteSaveFailed { .. }
        ));
    }
}
