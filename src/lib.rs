//! Course Library
//!
//! Back end for a course-materials chat bot:
//! - Taxonomy navigation (program → term → subject → lecture) over loosely
//!   structured documents with legacy compound keys
//! - Read-through taxonomy cache
//! - File search, reports and admin curation
//! - In-memory, JSON-file and PostgreSQL storage

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use tracing::info;

use api::state::AppState;
use infrastructure::auth::AdminAuthenticator;
use infrastructure::cache::{CachedTaxonomyRepository, TaxonomyCacheConfig};
use infrastructure::services::{CatalogService, NavigationService, ReportService};
use infrastructure::storage::{Repositories, StorageFactory};

/// Create the application state with default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    info!(storage = %config.storage.storage_type, "Initializing storage");

    let repositories = StorageFactory::create(&config.storage)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to initialize storage: {}", e))?;

    Ok(build_app_state(repositories, config))
}

/// Wire services over already constructed repositories
pub fn build_app_state(repositories: Repositories, config: &AppConfig) -> AppState {
    let Repositories {
        taxonomy,
        files,
        mailbox,
    } = repositories;

    let cache = Arc::new(CachedTaxonomyRepository::with_config(
        Arc::clone(&taxonomy),
        TaxonomyCacheConfig::from(&config.cache),
    ));

    let catalog = Arc::new(CatalogService::new(Arc::clone(&files), taxonomy, cache));
    let reports = Arc::new(ReportService::from_config(files, &config.reports));
    let navigation = Arc::new(NavigationService::new(
        Arc::clone(&catalog),
        Arc::clone(&reports),
        &config.navigation,
    ));
    let admin_auth = Arc::new(AdminAuthenticator::from_config(&config.admin));

    AppState::new(catalog, navigation, reports, mailbox, admin_auth)
}
