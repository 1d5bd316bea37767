use crate::models::AppState;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::{routing::get, Router};
use uuid::Uuid;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/files/{id}", get(fetch_file))
        .with_state(state)
}

async fn fetch_file(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> crate::types::AppResult<impl IntoResponse> {
    let (document, bytes) = state.pipeline.fetch_document(id).await?;

    let headers = [
        (
            header::CONTENT_TYPE,
            mime::APPLICATION_PDF.as_ref().to_string(),
        ),
        (
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{}\"", document.filename),
        ),
    ];
    Ok((headers, bytes))
}
