//! S3-compatible blob store.

use crate::config::StorageConfig;
use crate::storage::{object_key, validate_upload, BlobStore, StoredBlob};
use crate::types::{AppError, AppResult};
use async_trait::async_trait;
use s3::creds::Credentials;
use s3::error::S3Error;
use s3::{Bucket, Region};
use tracing::{debug, info};

pub struct S3BlobStore {
    bucket: Box<Bucket>,
    public_base_url: String,
}

impl S3BlobStore {
    pub fn from_config(config: &StorageConfig) -> AppResult<Self> {
        let region = match &config.endpoint {
            Some(endpoint) => Region::Custom {
                region: config.region.clone(),
                endpoint: endpoint.clone(),
            },
            None => config
                .region
                .parse()
                .map_err(|e| AppError::Storage(format!("invalid region '{}': {}", config.region, e)))?,
        };

        let credentials = Credentials::new(
            config.access_key_id.as_deref(),
            config.secret_access_key.as_deref(),
            None,
            None,
            None,
        )
        .map_err(|e| AppError::Storage(format!("credentials: {}", e)))?;

        let mut bucket = Bucket::new(&config.bucket, region, credentials)
            .map_err(|e| AppError::Storage(format!("bucket '{}': {}", config.bucket, e)))?;
        // S3-compatible backends (MinIO etc.) want path-style addressing.
        if config.endpoint.is_some() {
            bucket = bucket.with_path_style();
        }

        info!(bucket = %config.bucket, "S3 blob store ready");
        Ok(Self {
            bucket: Box::new(bucket),
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn store(
        &self,
        bytes: &[u8],
        content_type: &str,
        suggested_name: &str,
    ) -> AppResult<StoredBlob> {
        validate_upload(bytes, content_type)?;

        let key = object_key(suggested_name, chrono::Utc::now());
        let response = self
            .bucket
            .put_object_with_content_type(&key, bytes, content_type)
            .await
            .map_err(|e| AppError::Storage(format!("put '{}': {}", key, e)))?;
        if response.status_code() >= 300 {
            return Err(AppError::Storage(format!(
                "put '{}' returned status {}",
                key,
                response.status_code()
            )));
        }

        debug!(key = %key, size = bytes.len(), "stored blob");
        Ok(StoredBlob {
            public_url: format!("{}/{}", self.public_base_url, key),
            path: key,
            size: bytes.len(),
        })
    }

    async fn retrieve(&self, path: &str) -> AppResult<Vec<u8>> {
        let response = match self.bucket.get_object(path).await {
            Ok(response) => response,
            Err(S3Error::HttpFailWithBody(404, _)) => {
                return Err(AppError::NotFound(format!("no object at '{}'", path)))
            }
            Err(e) => return Err(AppError::Storage(format!("get '{}': {}", path, e))),
        };
        if response.status_code() == 404 {
            return Err(AppError::NotFound(format!("no object at '{}'", path)));
        }

        debug!(key = %path, size = response.bytes().len(), "retrieved blob");
        Ok(response.bytes().to_vec())
    }
}
