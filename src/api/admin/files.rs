//! File curation admin endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::api::middleware::RequireAdmin;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::api::v1::files::FileResponse;
use crate::domain::file::{FileUpdate, NewFile};
use crate::domain::taxonomy::LecturePath;
use crate::infrastructure::services::LectureDeletion;

#[derive(Debug, Clone, Serialize)]
pub struct ListFilesResponse {
    pub files: Vec<FileResponse>,
    pub total: usize,
}

/// GET /admin/files?program=&term=&subject=&lecture=
pub async fn list_files(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Query(path): Query<LecturePath>,
) -> Result<Json<ListFilesResponse>, ApiError> {
    debug!(?path, "Admin listing files on path");

    let files: Vec<FileResponse> = state
        .catalog
        .files_on_path(&path)
        .await?
        .into_iter()
        .map(FileResponse::from)
        .collect();
    let total = files.len();

    Ok(Json(ListFilesResponse { files, total }))
}

/// POST /admin/files
pub async fn create_file(
    State(state): State<AppState>,
    RequireAdmin(client): RequireAdmin,
    Json(request): Json<NewFile>,
) -> Result<(StatusCode, Json<FileResponse>), ApiError> {
    let record = state.catalog.create_file(request).await?;

    info!(client = %client, file_id = %record.id, "Admin created file");

    Ok((StatusCode::CREATED, Json(FileResponse::from(record))))
}

/// GET /admin/files/{id}
pub async fn get_file(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<String>,
) -> Result<Json<FileResponse>, ApiError> {
    let record = state.catalog.get_file_required(&id).await?;

    Ok(Json(FileResponse::from(record)))
}

/// PUT /admin/files/{id}
pub async fn update_file(
    State(state): State<AppState>,
    RequireAdmin(client): RequireAdmin,
    Path(id): Path<String>,
    Json(request): Json<FileUpdate>,
) -> Result<Json<FileResponse>, ApiError> {
    if request.is_empty() {
        return Err(ApiError::bad_request("Nothing to update"));
    }

    let record = state.catalog.update_file(&id, request).await?;

    info!(client = %client, file_id = %id, "Admin updated file");

    Ok(Json(FileResponse::from(record)))
}

/// DELETE /admin/files/{id}
pub async fn delete_file(
    State(state): State<AppState>,
    RequireAdmin(client): RequireAdmin,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.catalog.delete_file(&id).await?;

    info!(client = %client, file_id = %id, "Admin deleted file");

    Ok(Json(serde_json::json!({
        "deleted": true,
        "id": id
    })))
}

/// DELETE /admin/lectures
pub async fn delete_lecture(
    State(state): State<AppState>,
    RequireAdmin(client): RequireAdmin,
    Json(path): Json<LecturePath>,
) -> Result<Json<LectureDeletion>, ApiError> {
    let deletion = state.catalog.delete_lecture(&path).await?;

    info!(
        client = %client,
        lecture = %path.lecture,
        deleted_files = deletion.deleted_files,
        "Admin deleted lecture"
    );

    Ok(Json(deletion))
}
