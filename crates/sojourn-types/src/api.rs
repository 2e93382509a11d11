use serde::{Deserialize, Serialize};
use uuid::Uuid;

// -- Messaging --

/// Body for POST /messages and POST /messages/admin. The `status` field is
/// accepted for wire compatibility with existing clients but ignored: a
/// freshly sent message is always unread.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub text: String,
    pub sender: String,
    pub receiver: String,
    #[serde(default)]
    pub profile: Option<String>,
    #[serde(default)]
    pub status: Option<bool>,
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    pub id: Uuid,
}

// -- Notifications --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostNotificationRequest {
    pub sender: String,
    pub receiver: String,
    pub text: String,
    #[serde(default)]
    pub profile: Option<String>,
    pub role: String,
}

// -- Directory --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegisterVolunteerRequest {
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub countries: String,
    pub cities: String,
    pub university: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterVolunteerResponse {
    pub id: Uuid,
}
