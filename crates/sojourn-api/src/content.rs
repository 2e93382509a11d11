use std::collections::HashMap;

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use bytes::Bytes;
use chrono::Utc;
use uuid::Uuid;

use sojourn_types::models::{Post, Scholarship};

use crate::error::{ApiError, require};
use crate::{AppState, run_blocking};

const POST_FEED_LIMIT: u32 = 20;

// ── Multipart plumbing ──────────────────────────────────────────────────

struct UploadedFile {
    name: String,
    content_type: String,
    data: Bytes,
}

/// Text fields plus at most one `file` part, drained from a multipart body.
struct UploadForm {
    fields: HashMap<String, String>,
    file: Option<UploadedFile>,
}

impl UploadForm {
    async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut fields = HashMap::new();
        let mut file = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::Validation(format!("malformed multipart body: {}", e)))?
        {
            let name = field.name().unwrap_or_default().to_string();
            if name == "file" {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::Validation(format!("unreadable file part: {}", e)))?;
                file = Some(UploadedFile {
                    name: file_name,
                    content_type,
                    data,
                });
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::Validation(format!("unreadable field '{}': {}", name, e)))?;
                fields.insert(name, value);
            }
        }

        Ok(Self { fields, file })
    }

    fn take(&mut self, key: &str) -> String {
        self.fields.remove(key).unwrap_or_default()
    }

    /// Field value, falling back to the currently stored one on update.
    fn take_or(&mut self, key: &str, existing: &str) -> String {
        self.fields
            .remove(key)
            .unwrap_or_else(|| existing.to_string())
    }
}

/// Upload the form's file part and return its public URL. The response is
/// not sent until the store has acknowledged the write.
async fn upload(state: &AppState, file: &UploadedFile) -> Result<String, ApiError> {
    let stored = state
        .store
        .put(&file.data, &file.name, &file.content_type)
        .await
        .map_err(ApiError::Storage)?;
    Ok(stored.url)
}

// ── Scholarships ────────────────────────────────────────────────────────

/// POST /scholarship — multipart form with a required photo.
pub async fn create_scholarship(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut form = UploadForm::read(multipart).await?;
    let file = form
        .file
        .take()
        .ok_or_else(|| ApiError::Validation("photo file is required".to_string()))?;

    let scholarship = Scholarship {
        id: form.take("id"),
        name: form.take("name"),
        photo: String::new(),
        funding: form.take("funding"),
        eligibility: form.take("eligibility"),
        process: form.take("process"),
        dates: form.fields.remove("dates"),
        requirements: form.take("requirements"),
        additional: form.take("additional"),
    };
    require("id", &scholarship.id)?;
    require("name", &scholarship.name)?;

    let scholarship = Scholarship {
        photo: upload(&state, &file).await?,
        ..scholarship
    };

    let db = state.clone();
    let doc = scholarship.clone();
    run_blocking(move || db.db.insert_scholarship(&doc)).await?;

    Ok((StatusCode::CREATED, Json(scholarship)))
}

/// PUT /scholarship/{id} — full-field update; the photo is replaced only
/// when a new file is attached.
pub async fn update_scholarship(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<Scholarship>, ApiError> {
    let mut form = UploadForm::read(multipart).await?;

    let db = state.clone();
    let lookup = id.clone();
    let existing = run_blocking(move || db.db.get_scholarship(&lookup))
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("scholarship '{}' not found", id)))?;

    let photo = match form.file.take() {
        Some(file) => upload(&state, &file).await?,
        None => existing.photo.clone(),
    };

    let updated = Scholarship {
        id: existing.id.clone(),
        name: form.take_or("name", &existing.name),
        photo,
        funding: form.take_or("funding", &existing.funding),
        eligibility: form.take_or("eligibility", &existing.eligibility),
        process: form.take_or("process", &existing.process),
        dates: form.fields.remove("dates").or(existing.dates),
        requirements: form.take_or("requirements", &existing.requirements),
        additional: form.take_or("additional", &existing.additional),
    };

    let db = state.clone();
    let doc = updated.clone();
    run_blocking(move || db.db.update_scholarship(&doc)).await?;

    Ok(Json(updated))
}

/// GET /scholarships/{id}
pub async fn get_scholarship(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Scholarship>, ApiError> {
    let db = state.clone();
    let lookup = id.clone();
    let scholarship = run_blocking(move || db.db.get_scholarship(&lookup)).await?;
    scholarship
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("scholarship '{}' not found", id)))
}

/// GET /scholarships
pub async fn list_scholarships(
    State(state): State<AppState>,
) -> Result<Json<Vec<Scholarship>>, ApiError> {
    let db = state.clone();
    let scholarships = run_blocking(move || db.db.list_scholarships()).await?;
    Ok(Json(scholarships))
}

// ── Blog posts ──────────────────────────────────────────────────────────

/// POST /post — multipart form with a required cover image.
pub async fn create_post(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut form = UploadForm::read(multipart).await?;
    let file = form
        .file
        .take()
        .ok_or_else(|| ApiError::Validation("cover file is required".to_string()))?;

    let title = form.take("title");
    require("title", &title)?;

    let post = Post {
        id: Uuid::new_v4(),
        title,
        summary: form.take("summary"),
        content: form.take("content"),
        cover: upload(&state, &file).await?,
        created_at: Utc::now(),
    };

    let db = state.clone();
    let doc = post.clone();
    run_blocking(move || db.db.insert_post(&doc)).await?;

    Ok((StatusCode::CREATED, Json(post)))
}

/// PUT /post/{id} — cover kept unless a new file is attached.
pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<Post>, ApiError> {
    let mut form = UploadForm::read(multipart).await?;

    let db = state.clone();
    let lookup = id.clone();
    let existing = run_blocking(move || db.db.get_post(&lookup))
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("post '{}' not found", id)))?;

    let cover = match form.file.take() {
        Some(file) => upload(&state, &file).await?,
        None => existing.cover.clone(),
    };

    let updated = Post {
        id: existing.id,
        title: form.take_or("title", &existing.title),
        summary: form.take_or("summary", &existing.summary),
        content: form.take_or("content", &existing.content),
        cover,
        created_at: existing.created_at,
    };

    let db = state.clone();
    let doc = updated.clone();
    run_blocking(move || db.db.update_post(&doc)).await?;

    Ok(Json(updated))
}

/// GET /blog/{id}
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Post>, ApiError> {
    let db = state.clone();
    let lookup = id.clone();
    let post = run_blocking(move || db.db.get_post(&lookup)).await?;
    post.map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("post '{}' not found", id)))
}

/// GET /post — the latest posts, newest first.
pub async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<Post>>, ApiError> {
    let db = state.clone();
    let posts = run_blocking(move || db.db.list_posts(POST_FEED_LIMIT)).await?;
    Ok(Json(posts))
}
