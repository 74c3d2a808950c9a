//! Application state for shared services

use std::sync::Arc;

use crate::domain::mailbox::MailboxRepository;
use crate::infrastructure::auth::AdminAuthenticator;
use crate::infrastructure::services::{CatalogService, NavigationService, ReportService};

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogService>,
    pub navigation: Arc<NavigationService>,
    pub reports: Arc<ReportService>,
    pub mailbox: Arc<dyn MailboxRepository>,
    pub admin_auth: Arc<AdminAuthenticator>,
}

impl AppState {
    pub fn new(
        catalog: Arc<CatalogService>,
        navigation: Arc<NavigationService>,
        reports: Arc<ReportService>,
        mailbox: Arc<dyn MailboxRepository>,
        admin_auth: Arc<AdminAuthenticator>,
    ) -> Self {
        Self {
            catalog,
            navigation,
            reports,
            mailbox,
            admin_auth,
        }
    }
}
