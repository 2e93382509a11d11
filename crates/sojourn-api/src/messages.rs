use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use uuid::Uuid;

use sojourn_types::api::{SendMessageRequest, SendMessageResponse};
use sojourn_types::models::Message;

use crate::error::{ApiError, require};
use crate::{AppState, run_blocking};

/// POST /messages — send from the user surface. The message is stored under
/// the sender's partition.
pub async fn send_message(
    State(state): State<AppState>,
    Json(req): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let partition = req.sender.clone();
    store_message(state, req, partition).await
}

/// POST /messages/admin — send from the admin console. The message is stored
/// under the receiver's partition, so both sides of a conversation share one
/// store keyed by the non-admin participant.
pub async fn send_admin_message(
    State(state): State<AppState>,
    Json(req): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let partition = req.receiver.clone();
    store_message(state, req, partition).await
}

async fn store_message(
    state: AppState,
    req: SendMessageRequest,
    partition: String,
) -> Result<impl IntoResponse, ApiError> {
    require("sender", &req.sender)?;
    require("receiver", &req.receiver)?;
    require("text", &req.text)?;

    // Whatever the client claims, a fresh message is unread.
    let msg = Message {
        id: Uuid::new_v4(),
        partition,
        text: req.text,
        sender: req.sender,
        receiver: req.receiver,
        profile: req.profile,
        read: false,
        role: req.role,
        created_at: Utc::now(),
    };

    let id = msg.id;
    let db = state.clone();
    run_blocking(move || db.db.insert_message(&msg)).await?;

    Ok((StatusCode::CREATED, Json(SendMessageResponse { id })))
}

/// GET /messages/{sender}/{receiver} — full conversation history between the
/// two identities, oldest first, read from the sender-side partition.
pub async fn conversation_history(
    State(state): State<AppState>,
    Path((sender, receiver)): Path<(String, String)>,
) -> Result<Json<Vec<Message>>, ApiError> {
    let db = state.clone();
    let history = run_blocking(move || db.db.conversation_history(&sender, &receiver)).await?;
    Ok(Json(history))
}
