//! File lookup, search and report endpoints

use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::file::{FileRecord, FileSummary};
use crate::infrastructure::services::{ReportReceipt, INLINE_SEARCH_MIN_CHARS};

/// File record with its derived type label
#[derive(Debug, Clone, Serialize)]
pub struct FileResponse {
    #[serde(flatten)]
    pub record: FileRecord,
    pub file_type: String,
    pub label: String,
}

impl From<FileRecord> for FileResponse {
    fn from(record: FileRecord) -> Self {
        Self {
            file_type: record.file_type(),
            label: record.label().to_string(),
            record,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    /// Apply the inline-query minimum length
    #[serde(default)]
    pub inline: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub results: Vec<FileSummary>,
    pub total: usize,
    pub min_chars: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportRequest {
    pub user_id: i64,
}

/// GET /v1/files/{id}
pub async fn get_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FileResponse>, ApiError> {
    debug!(file_id = %id, "Getting file");

    let record = state.catalog.get_file_required(&id).await?;

    Ok(Json(FileResponse::from(record)))
}

/// GET /v1/search?q=&inline=
pub async fn search_files(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, ApiError> {
    debug!(query = %query.q, inline = query.inline, "Searching files");

    let results = if query.inline {
        state.catalog.search_inline(&query.q).await?
    } else {
        state.catalog.search_files(&query.q).await?
    };

    Ok(Json(SearchResponse {
        total: results.len(),
        results,
        min_chars: INLINE_SEARCH_MIN_CHARS,
    }))
}

/// POST /v1/files/{id}/report
pub async fn report_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ReportRequest>,
) -> Result<Json<ReportReceipt>, ApiError> {
    let receipt = state.reports.report_file(request.user_id, &id).await?;

    Ok(Json(receipt))
}
