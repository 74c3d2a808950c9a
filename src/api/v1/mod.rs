//! Public v1 API endpoints used by the chat adapter

pub mod files;
pub mod sessions;

use axum::{
    routing::{get, post},
    Router,
};

use super::state::AppState;

/// Create v1 API router
pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route("/sessions/{user_id}", get(sessions::get_session))
        .route("/sessions/{user_id}/start", post(sessions::start_session))
        .route("/sessions/{user_id}/actions", post(sessions::handle_action))
        .route("/sessions/{user_id}/search", post(sessions::search))
        .route("/files/{id}", get(files::get_file))
        .route("/files/{id}/report", post(files::report_file))
        .route("/search", get(files::search_files))
}
