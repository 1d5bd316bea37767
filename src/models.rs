// Core models and wire types.
// Note: FromRow is needed for runtime query_as (without DATABASE_URL at compile time)

use crate::config::Config;
use crate::pipeline::Pipeline;
use crate::types::AppError;
use std::sync::Arc;
use tokio::sync::broadcast;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub pipeline: Arc<Pipeline>,
    /// Fan-out channel for events addressed to every connected session.
    pub events: broadcast::Sender<ServerEvent>,
}

/// Persisted record for one uploaded PDF. Created once per successful
/// upload and immutable afterwards.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, sqlx::FromRow)]
pub struct Document {
    pub id: uuid::Uuid,
    pub storage_path: String,
    pub filename: String,
    pub upload_date: chrono::DateTime<chrono::Utc>,
    pub public_url: String,
}

/// Wire form of [`Document`], keeping the field names the frontend expects.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DocumentPayload {
    #[serde(rename = "documentId")]
    pub document_id: uuid::Uuid,
    pub filepath: String,
    pub filename: String,
    pub upload_date: chrono::DateTime<chrono::Utc>,
    pub public_url: String,
    #[serde(rename = "fileUrl")]
    pub file_url: String,
}

impl From<&Document> for DocumentPayload {
    fn from(doc: &Document) -> Self {
        Self {
            document_id: doc.id,
            filepath: doc.storage_path.clone(),
            filename: doc.filename.clone(),
            upload_date: doc.upload_date,
            public_url: doc.public_url.clone(),
            file_url: format!("/files/{}", doc.id),
        }
    }
}

// API request/response types

#[derive(Debug, serde::Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub success: bool,
    pub document: DocumentPayload,
}

#[derive(Debug, serde::Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub database: String,
}

// Realtime events. One JSON envelope per frame: {"event": ..., "data": ...}.

/// Events a session sends to the server.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    /// Associate the session with a document. No acknowledgement.
    StoreDocument {
        #[serde(rename = "documentId")]
        document_id: uuid::Uuid,
    },
    /// Run the question path. `documentId` falls back to the session's
    /// stored document when omitted.
    AskQuestion {
        #[serde(rename = "documentId")]
        document_id: Option<uuid::Uuid>,
        question: String,
    },
}

/// Events the server sends to sessions.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// Terminal event of one question. Addressed to the asking session only.
    ReceiveAnswer(AnswerPayload),
    /// Broadcast to all connected sessions after a successful upload.
    DocumentUploaded(DocumentPayload),
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AnswerPayload {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Underlying error detail, for diagnostics only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnswerPayload {
    pub fn ok(answer: String) -> Self {
        Self {
            success: true,
            answer: Some(answer),
            message: None,
            error: None,
        }
    }

    pub fn err(error: &AppError) -> Self {
        Self {
            success: false,
            answer: None,
            message: Some(error.user_message().to_string()),
            error: Some(error.to_string()),
        }
    }
}
