//! API middleware components

pub mod admin_auth;

pub use admin_auth::{RequireAdmin, ADMIN_TOKEN_HEADER};
