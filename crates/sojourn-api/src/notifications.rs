use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use uuid::Uuid;

use sojourn_types::api::PostNotificationRequest;
use sojourn_types::models::Notification;

use crate::error::{ApiError, require};
use crate::{AppState, run_blocking};

/// POST /notification — append a pending notice for a recipient's inbox.
pub async fn create_notification(
    State(state): State<AppState>,
    Json(req): Json<PostNotificationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require("sender", &req.sender)?;
    require("receiver", &req.receiver)?;

    let notice = Notification {
        id: Uuid::new_v4(),
        sender: req.sender,
        receiver: req.receiver,
        text: req.text,
        profile: req.profile,
        role: req.role,
        created_at: Utc::now(),
    };

    let id = notice.id;
    let db = state.clone();
    run_blocking(move || db.db.insert_notification(&notice)).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "id": id })),
    ))
}

/// GET /notifications/{user_name} — pending notices for one recipient,
/// newest first.
pub async fn list_notifications(
    State(state): State<AppState>,
    Path(user_name): Path<String>,
) -> Result<Json<Vec<Notification>>, ApiError> {
    let db = state.clone();
    let notices = run_blocking(move || db.db.notifications_for(&user_name)).await?;
    Ok(Json(notices))
}

/// GET /admin/notifications/{user_name} — the console-wide inbox: every
/// notice tagged role "admin", regardless of the path's recipient name.
pub async fn list_admin_notifications(
    State(state): State<AppState>,
    Path(_user_name): Path<String>,
) -> Result<Json<Vec<Notification>>, ApiError> {
    let db = state.clone();
    let notices = run_blocking(move || db.db.notifications_for_role("admin")).await?;
    Ok(Json(notices))
}

/// DELETE /notifications/{id}
pub async fn delete_notification(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let deleted = run_blocking(move || db.db.delete_notification(&id)).await?;
    if !deleted {
        return Err(ApiError::NotFound("notification not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_state;

    fn req(sender: &str, receiver: &str) -> PostNotificationRequest {
        PostNotificationRequest {
            sender: sender.to_string(),
            receiver: receiver.to_string(),
            text: "New message".to_string(),
            profile: None,
            role: "user".to_string(),
        }
    }

    #[tokio::test]
    async fn blank_parties_are_rejected_with_400() {
        let state = test_state().await;

        for body in [req("", "jane"), req("admin", "  ")] {
            let err = create_notification(State(state.clone()), Json(body))
                .await
                .err()
                .unwrap();
            assert!(matches!(err, ApiError::Validation(_)));
        }
        assert!(state.db.notifications_for("jane").unwrap().is_empty());
    }

    #[tokio::test]
    async fn valid_notices_are_stored() {
        let state = test_state().await;
        let created = create_notification(State(state.clone()), Json(req("admin", "jane"))).await;
        assert!(created.is_ok());
        assert_eq!(state.db.notifications_for("jane").unwrap().len(), 1);
    }
}
