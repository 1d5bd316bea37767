//! Realtime session channel.
//!
//! One JSON envelope per frame: `{"event": ..., "data": ...}`. Questions
//! run as independent tasks, so a slow OCR pass never blocks the
//! session's other traffic; every question produces exactly one
//! `receive-answer` event on the asking session. A client that
//! disconnects mid-question simply never sees its answer.

use crate::models::{AnswerPayload, AppState, ClientEvent, ServerEvent};
use crate::types::AppError;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use axum::{routing::get, Router};
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub fn router(state: AppState) -> Router {
    Router::new().route("/ws", get(ws_handler)).with_state(state)
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_session(socket, state))
}

async fn handle_session(socket: WebSocket, state: AppState) {
    info!("session connected");
    let (mut sink, mut stream) = socket.split();

    // Single writer task: per-question tasks and the broadcast forwarder
    // both funnel their events through this channel.
    let (tx, mut rx) = mpsc::channel::<ServerEvent>(32);
    let mut writer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match serde_json::to_string(&event) {
                Ok(json) => {
                    if sink.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(e) => warn!(error = %e, "failed to serialize event"),
            }
        }
    });

    // Forward document-uploaded broadcasts into this session.
    let broadcast_tx = tx.clone();
    let mut broadcast_rx = state.events.subscribe();
    let forwarder = tokio::spawn(async move {
        loop {
            match broadcast_rx.recv().await {
                Ok(event) => {
                    if broadcast_tx.send(event).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "session lagged behind broadcast events");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    // Affinity set by store-document. Owned by this loop; never shared
    // across an await point.
    let mut active_document: Option<Uuid> = None;

    loop {
        tokio::select! {
            message = stream.next() => {
                match message {
                    Some(Ok(Message::Text(text))) => {
                        handle_frame(text.as_str(), &state, &tx, &mut active_document);
                    }
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }
            _ = &mut writer => break,
        }
    }

    forwarder.abort();
    writer.abort();
    info!("session disconnected");
}

fn handle_frame(
    text: &str,
    state: &AppState,
    tx: &mpsc::Sender<ServerEvent>,
    active_document: &mut Option<Uuid>,
) {
    match serde_json::from_str::<ClientEvent>(text) {
        Ok(ClientEvent::StoreDocument { document_id }) => {
            debug!(document_id = %document_id, "session associated with document");
            // No acknowledgement.
            *active_document = Some(document_id);
        }
        Ok(ClientEvent::AskQuestion {
            document_id,
            question,
        }) => {
            let Some(document_id) = document_id.or(*active_document) else {
                let payload = AnswerPayload::err(&AppError::NotFound(
                    "no document selected for this session".to_string(),
                ));
                let _ = tx.try_send(ServerEvent::ReceiveAnswer(payload));
                return;
            };

            // Independent task per question; answers may arrive out of
            // submission order.
            let pipeline = state.pipeline.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let payload = match pipeline.answer_question(document_id, &question).await {
                    Ok(answer) => AnswerPayload::ok(answer),
                    Err(e) => {
                        warn!(document_id = %document_id, error = %e, "question failed");
                        AnswerPayload::err(&e)
                    }
                };
                let _ = tx.send(ServerEvent::ReceiveAnswer(payload)).await;
            });
        }
        Err(e) => debug!(error = %e, "ignoring malformed frame"),
    }
}
