use crate::db::MetadataStore;
use crate::models::Document;
use crate::types::{AppError, AppResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

pub struct PgMetadataStore {
    pool: PgPool,
}

impl PgMetadataStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MetadataStore for PgMetadataStore {
    async fn create(
        &self,
        storage_path: &str,
        filename: &str,
        upload_date: DateTime<Utc>,
        public_url: &str,
    ) -> AppResult<Document> {
        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO documents (id, storage_path, filename, upload_date, public_url)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(id)
        .bind(storage_path)
        .bind(filename)
        .bind(upload_date)
        .bind(public_url)
        .execute(&self.pool)
        .await?;

        // Durability is confirmed by reading the row back before the
        // client is acknowledged.
        let document = self
            .get_by_id(id)
            .await?
            .ok_or(AppError::Persistence(sqlx::Error::RowNotFound))?;

        debug!(document_id = %document.id, filename = %document.filename, "document created");
        Ok(document)
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Document>> {
        let document = sqlx::query_as::<_, Document>(
            r#"
            SELECT id, storage_path, filename, upload_date, public_url
            FROM documents
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(document)
    }
}
