//! Navigation session endpoints
//!
//! A thin chat adapter forwards button presses and text messages here and
//! renders the returned screen.

use axum::extract::{Path, State};
use serde::Deserialize;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::Json;
use crate::domain::navigation::{NavigationSession, Screen};

#[derive(Debug, Clone, Deserialize)]
pub struct ActionRequest {
    /// Callback data of the pressed button, e.g. `program:cs`
    pub data: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

/// POST /v1/sessions/{user_id}/start
pub async fn start_session(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Json<Screen> {
    debug!(user_id, "Starting navigation session");

    Json(state.navigation.start(user_id).await)
}

/// POST /v1/sessions/{user_id}/actions
pub async fn handle_action(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(request): Json<ActionRequest>,
) -> Json<Screen> {
    debug!(user_id, data = %request.data, "Navigation action");

    Json(state.navigation.handle(user_id, &request.data).await)
}

/// POST /v1/sessions/{user_id}/search
pub async fn search(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(request): Json<SearchRequest>,
) -> Json<Screen> {
    debug!(user_id, query = %request.query, "Navigation search");

    Json(state.navigation.search(user_id, &request.query).await)
}

/// GET /v1/sessions/{user_id}
pub async fn get_session(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Json<NavigationSession> {
    Json(state.navigation.session(user_id).await)
}
