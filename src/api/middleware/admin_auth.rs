//! Admin authentication extractor
//!
//! Reads the `X-Admin-Token` header and identifies the client by its peer
//! address, or by the first `X-Forwarded-For` address when the deployment
//! trusts that header.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{request::Parts, HeaderMap},
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;

pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

const UNKNOWN_CLIENT: &str = "unknown";

/// Extractor that requires a valid admin token; holds the client identifier
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub String);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string());
        let client = client_id(
            &parts.headers,
            peer,
            state.admin_auth.trust_forwarded_for(),
        );

        let token = parts
            .headers
            .get(ADMIN_TOKEN_HEADER)
            .map(|value| {
                value
                    .to_str()
                    .map_err(|_| ApiError::bad_request("Invalid X-Admin-Token header encoding"))
            })
            .transpose()?
            .map(str::trim);

        state.admin_auth.authenticate(&client, token).await?;

        debug!(client = %client, "Admin access granted");
        Ok(RequireAdmin(client))
    }
}

fn client_id(headers: &HeaderMap, peer: Option<String>, trust_forwarded_for: bool) -> String {
    let forwarded = trust_forwarded_for
        .then(|| headers.get("x-forwarded-for"))
        .flatten()
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(String::from);

    forwarded
        .or(peer)
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}
