//! Metadata persistence for uploaded documents.

use crate::config::DatabaseConfig;
use crate::models::Document;
use crate::types::AppResult;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use uuid::Uuid;

pub mod documents;

pub use documents::PgMetadataStore;

pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect(&config.url)
        .await?;

    // Test connection
    sqlx::query("SELECT 1").fetch_one(&pool).await?;

    Ok(pool)
}

#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Assign a fresh id and persist the record. The row is read back by id
    /// before returning, so a successful `create` guarantees `get_by_id`
    /// succeeds immediately afterwards.
    async fn create(
        &self,
        storage_path: &str,
        filename: &str,
        upload_date: DateTime<Utc>,
        public_url: &str,
    ) -> AppResult<Document>;

    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Document>>;
}
