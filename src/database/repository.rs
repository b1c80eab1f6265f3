//! Repository layer for the local cache
//!
//! Each entity kind lives in one named bucket holding the full
//! collection as a JSON snapshot. Writes are read-modify-write over
//! the snapshot; the gateway serializes access, so there is no
//! concurrent writer to race against.

use super::models::Entity;
use crate::error::Result;
use sqlx::SqlitePool;

/// Repository for local cache operations
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Load a collection snapshot. `None` means the bucket has never
    /// been written (distinct from an explicitly empty collection).
    pub async fn load<T: Entity>(&self) -> Result<Option<Vec<T>>> {
        let snapshot: Option<String> =
            sqlx::query_scalar("SELECT data FROM buckets WHERE name = ?")
                .bind(T::BUCKET)
                .fetch_optional(&self.pool)
                .await?;

        match snapshot {
            Some(json) => {
                let items: Vec<T> = serde_json::from_str(&json)?;
                tracing::debug!("Loaded {} items from bucket '{}'", items.len(), T::BUCKET);
                Ok(Some(items))
            }
            None => Ok(None),
        }
    }

    /// Replace a collection snapshot wholesale.
    pub async fn save_all<T: Entity>(&self, items: &[T]) -> Result<()> {
        let json = serde_json::to_string(items)?;

        sqlx::query(
            r#"
            INSERT INTO buckets (name, data, updated_at) VALUES (?, ?, CURRENT_TIMESTAMP)
            ON CONFLICT(name) DO UPDATE SET data = excluded.data, updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(T::BUCKET)
        .bind(&json)
        .execute(&self.pool)
        .await?;

        tracing::debug!("Saved {} items to bucket '{}'", items.len(), T::BUCKET);
        Ok(())
    }

    /// Upsert one entity by id: update in place if present, append
    /// otherwise.
    pub async fn upsert<T: Entity>(&self, entity: &T) -> Result<()> {
        let mut items: Vec<T> = self.load().await?.unwrap_or_default();

        match items.iter_mut().find(|item| item.id() == entity.id()) {
            Some(existing) => *existing = entity.clone(),
            None => items.push(entity.clone()),
        }

        self.save_all(&items).await?;

        tracing::debug!("Upserted '{}' into bucket '{}'", entity.id(), T::BUCKET);
        Ok(())
    }

    /// Remove one entity by id. Removing an absent id is a no-op.
    pub async fn delete<T: Entity>(&self, id: &str) -> Result<()> {
        let mut items: Vec<T> = self.load().await?.unwrap_or_default();
        let before = items.len();
        items.retain(|item| item.id() != id);

        if items.len() != before {
            self.save_all(&items).await?;
            tracing::debug!("Deleted '{}' from bucket '{}'", id, T::BUCKET);
        }

        Ok(())
    }
}
