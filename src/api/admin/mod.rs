//! Admin API endpoints for curating files and inspecting the taxonomy

pub mod files;
pub mod mailbox;
pub mod taxonomy;

use axum::{
    routing::{delete, get, post},
    Router,
};

use super::state::AppState;

/// Create admin API router
pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        .route("/files", get(files::list_files).post(files::create_file))
        .route(
            "/files/{id}",
            get(files::get_file)
                .put(files::update_file)
                .delete(files::delete_file),
        )
        .route("/lectures", delete(files::delete_lecture))
        .route("/taxonomy/options", get(taxonomy::get_options))
        .route("/taxonomy/cache/flush", post(taxonomy::flush_cache))
        .route("/taxonomy/{doc_id}", get(taxonomy::get_document))
        .route("/mailbox", get(mailbox::get_mailbox).put(mailbox::set_mailbox))
}
