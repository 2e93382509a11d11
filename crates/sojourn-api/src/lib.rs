pub mod content;
pub mod conversations;
pub mod directory;
pub mod error;
pub mod inbox;
pub mod messages;
pub mod notifications;

use std::sync::Arc;

use sojourn_db::Database;
use sojourn_store::ObjectStore;

use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub store: ObjectStore,
}

/// Run blocking SQLite work off the async runtime and fold both the join
/// error and the query error into [`ApiError`].
pub(crate) async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Storage(anyhow::anyhow!("blocking task join error: {}", e)))?
        .map_err(ApiError::Storage)
}

/// Handler tests run against an in-memory database and a throwaway
/// object-store directory.
#[cfg(test)]
pub(crate) async fn test_state() -> AppState {
    let dir = std::env::temp_dir().join(format!("sojourn-api-test-{}", uuid::Uuid::new_v4()));
    let store = ObjectStore::new(dir, "http://localhost:8000".to_string())
        .await
        .unwrap();
    Arc::new(AppStateInner {
        db: Database::open_in_memory().unwrap(),
        store,
    })
}
