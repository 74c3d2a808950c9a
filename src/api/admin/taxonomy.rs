//! Taxonomy inspection admin endpoints

use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::middleware::RequireAdmin;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::taxonomy::{
    build_lookup_key, TaxonomyDocument, TaxonomyDocumentId, TaxonomyLevel, TaxonomyPath,
};

#[derive(Debug, Clone, Serialize)]
pub struct DocumentResponse {
    pub doc_id: TaxonomyDocumentId,
    pub document: TaxonomyDocument,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OptionsQuery {
    pub level: TaxonomyLevel,
    #[serde(flatten)]
    pub path: TaxonomyPath,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptionsResponse {
    pub level: TaxonomyLevel,
    /// Key the options were resolved under; absent for programs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookup_key: Option<String>,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlushQuery {
    pub doc_id: Option<String>,
}

/// GET /admin/taxonomy/{doc_id}
///
/// Reads straight from the store so operators see writes not yet visible
/// through the cache.
pub async fn get_document(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(doc_id): Path<String>,
) -> Result<Json<DocumentResponse>, ApiError> {
    let doc_id: TaxonomyDocumentId = doc_id.parse()?;

    debug!(doc_id = %doc_id, "Admin reading taxonomy document");

    let document = state.catalog.raw_document(doc_id.as_str()).await?;

    Ok(Json(DocumentResponse { doc_id, document }))
}

/// GET /admin/taxonomy/options?level=&program=&term=&subject=
pub async fn get_options(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Query(query): Query<OptionsQuery>,
) -> Result<Json<OptionsResponse>, ApiError> {
    let options = state.catalog.options(&query.path, query.level).await?;
    let lookup_key = query
        .level
        .previous()
        .map(|parent| build_lookup_key(&query.path, parent));

    Ok(Json(OptionsResponse {
        level: query.level,
        lookup_key,
        options,
    }))
}

/// POST /admin/taxonomy/cache/flush?doc_id=
pub async fn flush_cache(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Query(query): Query<FlushQuery>,
) -> Json<serde_json::Value> {
    state.catalog.flush_cache(query.doc_id.as_deref()).await;

    Json(serde_json::json!({
        "flushed": query.doc_id.unwrap_or_else(|| "all".to_string())
    }))
}
