use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use sojourn_types::api::{RegisterVolunteerRequest, RegisterVolunteerResponse};
use sojourn_types::models::{User, Volunteer};

use crate::error::{ApiError, require};
use crate::{AppState, run_blocking};

/// POST /volunteers/register
pub async fn register_volunteer(
    State(state): State<AppState>,
    Json(req): Json<RegisterVolunteerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require("firstName", &req.first_name)?;
    require("lastName", &req.last_name)?;
    require("gender", &req.gender)?;
    require("countries", &req.countries)?;
    require("cities", &req.cities)?;
    require("university", &req.university)?;

    let volunteer = Volunteer {
        id: Uuid::new_v4(),
        first_name: req.first_name,
        last_name: req.last_name,
        gender: req.gender,
        countries: req.countries,
        cities: req.cities,
        university: req.university,
        image: req.image,
    };

    let id = volunteer.id;
    let db = state.clone();
    run_blocking(move || db.db.insert_volunteer(&volunteer)).await?;

    Ok((StatusCode::CREATED, Json(RegisterVolunteerResponse { id })))
}

/// GET /volunteer-collections
pub async fn list_volunteers(
    State(state): State<AppState>,
) -> Result<Json<Vec<Volunteer>>, ApiError> {
    let db = state.clone();
    let volunteers = run_blocking(move || db.db.list_volunteers()).await?;
    Ok(Json(volunteers))
}

/// GET /user-collections — contact list for the admin console: every
/// non-admin user, alphabetical.
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    let db = state.clone();
    let users = run_blocking(move || db.db.list_users()).await?;
    Ok(Json(users))
}

/// GET /api/users/{name}
pub async fn get_user(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<User>, ApiError> {
    let db = state.clone();
    let lookup = name.clone();
    let user = run_blocking(move || db.db.get_user(&lookup)).await?;
    user.map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("user '{}' not found", name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_state;

    fn req(first: &str, last: &str) -> RegisterVolunteerRequest {
        RegisterVolunteerRequest {
            first_name: first.to_string(),
            last_name: last.to_string(),
            gender: "F".to_string(),
            countries: "Kenya".to_string(),
            cities: "Nairobi".to_string(),
            university: "Strathmore".to_string(),
            image: None,
        }
    }

    #[tokio::test]
    async fn blank_names_are_rejected_with_400() {
        let state = test_state().await;

        for body in [req("", "Doe"), req("Jane", "   ")] {
            let err = register_volunteer(State(state.clone()), Json(body))
                .await
                .err()
                .unwrap();
            assert!(matches!(err, ApiError::Validation(_)));
        }
        assert!(state.db.list_volunteers().unwrap().is_empty());
    }

    #[tokio::test]
    async fn valid_registrations_are_stored() {
        let state = test_state().await;
        let created = register_volunteer(State(state.clone()), Json(req("Jane", "Doe"))).await;
        assert!(created.is_ok());
        assert_eq!(state.db.find_volunteers("Jane", "Doe").unwrap().len(), 1);
    }
}
