//! Upload mailbox admin endpoints

use axum::extract::State;
use chrono::Utc;
use tracing::info;

use crate::api::middleware::RequireAdmin;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::mailbox::{MailboxEntry, MailboxRepository, MailboxUpdate};

/// GET /admin/mailbox
pub async fn get_mailbox(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
) -> Result<Json<MailboxEntry>, ApiError> {
    Ok(Json(state.mailbox.get().await?))
}

/// PUT /admin/mailbox
pub async fn set_mailbox(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Json(update): Json<MailboxUpdate>,
) -> Result<Json<MailboxEntry>, ApiError> {
    let entry = update.into_entry(Utc::now());

    state.mailbox.set(entry.clone()).await?;

    info!(
        file_id = entry.last_uploaded_file_id.as_deref().unwrap_or_default(),
        "Mailbox updated"
    );

    Ok(Json(entry))
}
