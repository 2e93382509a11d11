use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use sojourn_api::{AppState, AppStateInner, content, conversations, directory, inbox, messages, notifications};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sojourn=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let db_path = std::env::var("SOJOURN_DB_PATH").unwrap_or_else(|_| "sojourn.db".into());
    let host = std::env::var("SOJOURN_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("SOJOURN_PORT")
        .unwrap_or_else(|_| "8000".into())
        .parse()?;
    let upload_dir = std::env::var("SOJOURN_UPLOAD_DIR").unwrap_or_else(|_| "uploads".into());
    let public_url = std::env::var("SOJOURN_PUBLIC_URL")
        .unwrap_or_else(|_| format!("http://localhost:{}", port));

    // Init storage
    let db = sojourn_db::Database::open(&PathBuf::from(&db_path))?;
    let store = sojourn_store::ObjectStore::new(PathBuf::from(&upload_dir), public_url).await?;
    let serve_uploads = ServeDir::new(store.storage_dir().clone());

    let state: AppState = Arc::new(AppStateInner { db, store });

    // Routes. The bare /{receiver}/{sender} open-conversation routes are
    // catch-alls; every static prefix above wins route matching over them.
    let messaging = Router::new()
        .route("/messages", post(messages::send_message))
        .route("/messages/admin", post(messages::send_admin_message))
        .route("/messages/{sender}/{receiver}", get(messages::conversation_history))
        .route("/receivers/{sender}", get(inbox::user_inbox))
        .route("/admin/receivers/{sender}", get(inbox::admin_inbox))
        .route("/notification", post(notifications::create_notification))
        .route(
            "/notifications/{name}",
            get(notifications::list_notifications).delete(notifications::delete_notification),
        )
        .route("/admin/notifications/{name}", get(notifications::list_admin_notifications))
        .route("/{receiver}/{sender}", get(conversations::open_user_conversation))
        .route("/admin/{receiver}/{sender}", get(conversations::open_admin_conversation));

    let directory_routes = Router::new()
        .route("/volunteers/register", post(directory::register_volunteer))
        .route("/volunteer-collections", get(directory::list_volunteers))
        .route("/user-collections", get(directory::list_users))
        .route("/api/users/{name}", get(directory::get_user));

    let content_routes = Router::new()
        .route("/scholarship", post(content::create_scholarship))
        .route("/scholarship/{id}", put(content::update_scholarship))
        .route("/scholarships", get(content::list_scholarships))
        .route("/scholarships/{id}", get(content::get_scholarship))
        .route("/post", post(content::create_post).get(content::list_posts))
        .route("/post/{id}", put(content::update_post))
        .route("/blog/{id}", get(content::get_post));

    let app = Router::new()
        .merge(messaging)
        .merge(directory_routes)
        .merge(content_routes)
        .nest_service("/uploads", serve_uploads)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Sojourn server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
