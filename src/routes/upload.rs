use crate::models::{AppState, DocumentPayload, ServerEvent, UploadResponse};
use crate::types::{AppError, AppResult};
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::{routing::post, Json, Router};
use tracing::{debug, info};

/// Uploads above this size are rejected before buffering.
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/upload", post(upload_pdf))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

async fn upload_pdf(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    let mut upload: Option<(Vec<u8>, String, String)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("malformed multipart body: {}", e)))?
    {
        if field.name() != Some("pdf") {
            continue;
        }
        let content_type = field.content_type().unwrap_or_default().to_string();
        let filename = field.file_name().unwrap_or("document.pdf").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidInput(format!("failed to read upload: {}", e)))?;
        upload = Some((bytes.to_vec(), content_type, filename));
        break;
    }

    let (bytes, content_type, filename) =
        upload.ok_or_else(|| AppError::InvalidInput("missing 'pdf' form field".to_string()))?;
    info!(filename = %filename, size = bytes.len(), "upload received");

    let document = state.pipeline.upload(&bytes, &content_type, &filename).await?;
    let payload = DocumentPayload::from(&document);

    // Broadcast goes to every connected session, not only the uploader.
    // Send only errors when nobody is connected.
    if state
        .events
        .send(ServerEvent::DocumentUploaded(payload.clone()))
        .is_err()
    {
        debug!("no sessions connected for document-uploaded broadcast");
    }

    Ok(Json(UploadResponse {
        message: "PDF uploaded successfully".to_string(),
        success: true,
        document: payload,
    }))
}
