//! Remote store REST client
//!
//! Thin typed client over the remote collection API:
//! `GET /{collection}` lists documents, `PUT /{collection}/{id}`
//! upserts one, `DELETE /{collection}/{id}` removes one. The gateway
//! treats every call here as best-effort; errors propagate out and are
//! downgraded to warnings there.

use crate::config::{REMOTE_TOKEN_ENV, REMOTE_URL_ENV};
use crate::database::models::Entity;
use crate::error::Result;
use std::time::Duration;

/// Connection settings for the remote store
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub base_url: String,
    pub token: Option<String>,
}

impl RemoteConfig {
    /// Read the remote endpoint from the environment. `None` when no
    /// URL is configured — the engine then runs local-only.
    pub fn from_env() -> Option<Self> {
        let base_url = std::env::var(REMOTE_URL_ENV).ok()?;
        if base_url.trim().is_empty() {
            return None;
        }
        Some(Self {
            base_url,
            token: std::env::var(REMOTE_TOKEN_ENV).ok(),
        })
    }
}

/// Typed REST client for the remote store
#[derive(Clone)]
pub struct RemoteStore {
    client: reqwest::Client,
    config: RemoteConfig,
}

impl RemoteStore {
    pub fn new(config: RemoteConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("timegrid")
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self { client, config })
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), collection)
    }

    fn document_url(&self, collection: &str, id: &str) -> String {
        format!("{}/{}", self.collection_url(collection), id)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Fetch every document of one collection.
    pub async fn fetch_collection<T: Entity>(&self) -> Result<Vec<T>> {
        let url = self.collection_url(T::BUCKET);
        tracing::debug!("Fetching remote collection: {}", url);

        let items = self
            .authorize(self.client.get(&url))
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<T>>()
            .await?;

        tracing::debug!("Fetched {} remote documents from '{}'", items.len(), T::BUCKET);
        Ok(items)
    }

    /// Upsert one document by id.
    pub async fn put<T: Entity>(&self, entity: &T) -> Result<()> {
        let url = self.document_url(T::BUCKET, entity.id());

        self.authorize(self.client.put(&url))
            .json(entity)
            .send()
            .await?
            .error_for_status()?;

        tracing::debug!("Mirrored '{}' to remote '{}'", entity.id(), T::BUCKET);
        Ok(())
    }

    /// Delete one document by id.
    pub async fn delete<T: Entity>(&self, id: &str) -> Result<()> {
        let url = self.document_url(T::BUCKET, id);

        self.authorize(self.client.delete(&url))
            .send()
            .await?
            .error_for_status()?;

        tracing::debug!("Deleted '{}' from remote '{}'", id, T::BUCKET);
        Ok(())
    }
}
