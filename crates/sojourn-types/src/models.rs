use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single chat message.
///
/// `partition` is the identity whose conversation store holds the message:
/// the sender for user-side sends, the receiver for admin-side sends. Every
/// partition-scoped query (history, summaries, mark-read) filters on it.
/// `read` serializes as `status` — false means unread by `receiver`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    #[serde(skip_serializing, default)]
    pub partition: String,
    pub text: String,
    pub sender: String,
    pub receiver: String,
    pub profile: Option<String>,
    #[serde(rename = "status")]
    pub read: bool,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// A pending notice for a recipient's inbox. Append-only; deleted when the
/// target conversation is read or explicitly by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub sender: String,
    pub receiver: String,
    pub text: String,
    pub profile: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// Derived inbox entry: one per counterpart a participant has exchanged
/// messages with. Never persisted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    pub counterpart: String,
    pub last_text: String,
    pub last_time: Option<DateTime<Utc>>,
    pub profile: Option<String>,
    pub unread_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volunteer {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub countries: String,
    pub cities: String,
    pub university: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub fullname: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub pincode: Option<String>,
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scholarship {
    pub id: String,
    pub name: String,
    pub photo: String,
    pub funding: String,
    pub eligibility: String,
    pub process: String,
    pub dates: Option<String>,
    pub requirements: String,
    pub additional: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub summary: String,
    pub content: String,
    pub cover: String,
    pub created_at: DateTime<Utc>,
}
