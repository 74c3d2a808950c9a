//! Authentication infrastructure - admin token verification

mod admin;

pub use admin::{hash_token, AdminAuthenticator};
