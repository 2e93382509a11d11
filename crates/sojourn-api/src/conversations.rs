use axum::{
    Json,
    extract::{Path, State},
};
use tracing::debug;

use sojourn_types::models::Volunteer;

use crate::error::ApiError;
use crate::{AppState, run_blocking};

/// Split a display name into (first name, last name): first token, remainder.
fn split_display_name(name: &str) -> (String, String) {
    match name.split_once(' ') {
        Some((first, rest)) => (first.to_string(), rest.to_string()),
        None => (name.to_string(), String::new()),
    }
}

/// GET /{receiver}/{sender} — a user opens the conversation with
/// `receiver` (counterpart display name) inside the `sender` partition.
///
/// Resolves the counterpart's volunteer profile, marks their user-surface
/// messages read, and clears the matching user-inbox notices. The three
/// steps are deliberately non-transactional: a failure in between leaves a
/// read message with its notice still pending, which the next open clears.
pub async fn open_user_conversation(
    State(state): State<AppState>,
    Path((receiver, sender)): Path<(String, String)>,
) -> Result<Json<Vec<Volunteer>>, ApiError> {
    let profiles = resolve_profiles(&state, &receiver).await?;

    let db = state.clone();
    let (counterpart, viewer) = (receiver.clone(), sender.clone());
    let marked =
        run_blocking(move || db.db.mark_read(&viewer, &counterpart, &viewer, "user")).await?;

    let db = state.clone();
    let cleared = run_blocking(move || {
        db.db.delete_notifications_matching(&receiver, &sender, "user")
    })
    .await?;

    debug!("Reconciled user conversation: {} read, {} notices cleared", marked, cleared);
    Ok(Json(profiles))
}

/// GET /admin/{receiver}/{sender} — the admin console (`receiver`) opens the
/// conversation held in the `sender` partition, whose owner is the
/// counterpart. Marks the counterpart's user-surface messages read and
/// clears the admin-inbox notices for the pair.
pub async fn open_admin_conversation(
    State(state): State<AppState>,
    Path((receiver, sender)): Path<(String, String)>,
) -> Result<Json<Vec<Volunteer>>, ApiError> {
    let profiles = resolve_profiles(&state, &sender).await?;

    let db = state.clone();
    let (counterpart, viewer) = (sender.clone(), receiver.clone());
    let marked =
        run_blocking(move || db.db.mark_read(&counterpart, &counterpart, &viewer, "user")).await?;

    let db = state.clone();
    let cleared = run_blocking(move || {
        db.db.delete_notifications_matching(&sender, &receiver, "admin")
    })
    .await?;

    debug!("Reconciled admin conversation: {} read, {} notices cleared", marked, cleared);
    Ok(Json(profiles))
}

/// Volunteer lookup by display name. No match is an empty list, not an
/// error: plenty of identities (plain users, the console itself) have no
/// volunteer profile.
async fn resolve_profiles(state: &AppState, display_name: &str) -> Result<Vec<Volunteer>, ApiError> {
    let (first, last) = split_display_name(display_name);
    let db = state.clone();
    run_blocking(move || db.db.find_volunteers(&first, &last)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_splits_on_first_space() {
        assert_eq!(
            split_display_name("Jane Doe"),
            ("Jane".to_string(), "Doe".to_string())
        );
        assert_eq!(
            split_display_name("Mary Anne van der Berg"),
            ("Mary".to_string(), "Anne van der Berg".to_string())
        );
        assert_eq!(
            split_display_name("admin"),
            ("admin".to_string(), String::new())
        );
    }
}
