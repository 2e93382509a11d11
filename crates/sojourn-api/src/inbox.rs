use axum::{
    Json,
    extract::{Path, State},
};

use sojourn_types::models::ConversationSummary;

use crate::error::ApiError;
use crate::{AppState, run_blocking};

/// GET /receivers/{sender} — user-surface inbox: one entry per counterpart
/// with last message and the unread count of user-surface traffic.
pub async fn user_inbox(
    State(state): State<AppState>,
    Path(sender): Path<String>,
) -> Result<Json<Vec<ConversationSummary>>, ApiError> {
    let db = state.clone();
    let summaries = run_blocking(move || db.db.summarize(&sender, "user")).await?;
    Ok(Json(summaries))
}

/// GET /admin/receivers/{sender} — same shape for the admin console, counting
/// admin-surface traffic instead.
pub async fn admin_inbox(
    State(state): State<AppState>,
    Path(sender): Path<String>,
) -> Result<Json<Vec<ConversationSummary>>, ApiError> {
    let db = state.clone();
    let summaries = run_blocking(move || db.db.summarize(&sender, "admin")).await?;
    Ok(Json(summaries))
}
