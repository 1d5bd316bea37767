//! Blob storage for raw PDF bytes.
//!
//! Objects are addressed by the key returned from `store`; the metadata
//! record keeps that key so the question path can fetch the bytes back.

use crate::types::{AppError, AppResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub mod s3;

pub use s3::S3BlobStore;

/// Result of a successful `store` call.
#[derive(Debug, Clone)]
pub struct StoredBlob {
    pub path: String,
    pub public_url: String,
    pub size: usize,
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Persist `bytes` under a fresh collision-free key.
    ///
    /// Fails with `InvalidInput` for an empty payload or a non-PDF content
    /// type, `Storage` on backend I/O failure. Neither is retried here.
    async fn store(
        &self,
        bytes: &[u8],
        content_type: &str,
        suggested_name: &str,
    ) -> AppResult<StoredBlob>;

    /// Fetch the bytes stored under `path`. `NotFound` when no object
    /// exists there.
    async fn retrieve(&self, path: &str) -> AppResult<Vec<u8>>;
}

/// Upload preconditions shared by every backend.
pub fn validate_upload(bytes: &[u8], content_type: &str) -> AppResult<()> {
    if bytes.is_empty() {
        return Err(AppError::InvalidInput("empty payload".to_string()));
    }
    if content_type != mime::APPLICATION_PDF.as_ref() {
        return Err(AppError::InvalidInput(format!(
            "unsupported content type '{}', only application/pdf is accepted",
            content_type
        )));
    }
    Ok(())
}

/// Restrict a client-supplied filename to alphanumerics, dot and hyphen.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Namespace a sanitized filename with the upload instant so concurrent
/// uploads of identically named files never collide.
pub fn object_key(suggested_name: &str, uploaded_at: DateTime<Utc>) -> String {
    format!(
        "uploads/{}_{}",
        uploaded_at.timestamp_millis(),
        sanitize_filename(suggested_name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_keeps_allowed_chars() {
        assert_eq!(sanitize_filename("Invoice-2024.pdf"), "Invoice-2024.pdf");
    }

    #[test]
    fn test_sanitize_replaces_everything_else() {
        assert_eq!(sanitize_filename("a b/c\\d.pdf"), "a_b_c_d.pdf");
        assert_eq!(sanitize_filename("résumé.pdf"), "r_sum_.pdf");
    }

    #[test]
    fn test_object_key_is_namespaced_by_instant() {
        let t0 = chrono::DateTime::from_timestamp(1_712_000_000, 0).unwrap();
        let t1 = chrono::DateTime::from_timestamp(1_712_000_001, 0).unwrap();
        let a = object_key("report.pdf", t0);
        let b = object_key("report.pdf", t1);
        assert_ne!(a, b);
        assert!(a.starts_with("uploads/"));
        assert!(a.ends_with("_report.pdf"));
    }

    #[test]
    fn test_validate_rejects_empty_payload() {
        let err = validate_upload(&[], "application/pdf").unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_validate_rejects_wrong_media_type() {
        let err = validate_upload(b"%PDF-1.7", "text/plain").unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_validate_accepts_pdf() {
        assert!(validate_upload(b"%PDF-1.7", "application/pdf").is_ok());
    }
}
