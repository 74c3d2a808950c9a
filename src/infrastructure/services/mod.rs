//! Infrastructure services

mod catalog_service;
mod navigation_service;
mod report_service;

pub use catalog_service::{CatalogService, LectureDeletion, INLINE_SEARCH_MIN_CHARS};
pub use navigation_service::NavigationService;
pub use report_service::{ReportReceipt, ReportService};
