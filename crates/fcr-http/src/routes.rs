//! HTTP API Route Definitions

use std::path::Path;

use axum::{routing::get, Router};
use tower_http::services::{ServeDir, ServeFile};

use crate::handlers::{self, AppState};

/// Create the router with all routes.
///
/// The bare `/watch/`, `/download/` and `/api/send_link/` routes exist so an
/// empty id gets a 400 instead of a 404.
pub fn create_router(app_state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/latest", get(handlers::latest))
        .route("/api/search", get(handlers::search))
        .route("/api/send_link/", get(handlers::send_link))
        .route("/api/send_link/:file_id", get(handlers::send_link))
        .route("/watch/", get(handlers::watch))
        .route("/watch/:file_id", get(handlers::watch))
        .route("/download/", get(handlers::download))
        .route("/download/:file_id", get(handlers::download))
        .with_state(app_state)
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .nest_service("/static", ServeDir::new(static_dir))
}
