// Error taxonomy shared by every layer of the pipeline.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Bad upload: wrong media type or empty payload. Rejected before any
    /// side effect.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Blob backend I/O failure. Surfaced to the caller, not retried.
    #[error("storage error: {0}")]
    Storage(String),

    /// Metadata backend failure. Not retried, no compensating rollback.
    #[error("metadata store error: {0}")]
    Persistence(#[from] sqlx::Error),

    /// Unknown document id or missing blob. Terminal for the request.
    #[error("not found: {0}")]
    NotFound(String),

    /// Both the text-layer and the OCR path failed.
    #[error("text extraction failed: {0}")]
    Extraction(String),

    /// Generation backend errored or returned no content.
    #[error("answer generation failed: {0}")]
    Generation(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type AppResult<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Storage(_) => StatusCode::BAD_GATEWAY,
            AppError::Persistence(_)
            | AppError::Extraction(_)
            | AppError::Generation(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to end users. Diagnostic detail stays in the
    /// `Display` impl and the logs.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "Invalid upload",
            AppError::Storage(_) => "Error uploading PDF",
            AppError::Persistence(_) => "Error saving PDF metadata",
            AppError::NotFound(_) => "Document not found",
            AppError::Extraction(_) => "Could not process document.",
            AppError::Generation(_) | AppError::Internal(_) => "Error processing question.",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "message": self.user_message(),
            "success": false,
        });
        (self.status_code(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_distinct() {
        let err = AppError::NotFound("missing".into());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.user_message(), "Document not found");
    }

    #[test]
    fn test_extraction_message_differs_from_generation() {
        let extraction = AppError::Extraction("both paths failed".into());
        let generation = AppError::Generation("backend 500".into());
        assert_ne!(extraction.user_message(), generation.user_message());
        assert_eq!(extraction.user_message(), "Could not process document.");
    }

    #[test]
    fn test_invalid_input_is_client_error() {
        let err = AppError::InvalidInput("empty payload".into());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
