//! Infrastructure layer - Storage backends, caching and services

pub mod auth;
pub mod cache;
pub mod logging;
pub mod rate_limit;
pub mod services;
pub mod storage;
