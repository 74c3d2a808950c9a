//! File report service - users flag broken files for manual review

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::config::ReportsConfig;
use crate::domain::file::FileRepository;
use crate::domain::DomainError;
use crate::infrastructure::rate_limit::SlidingWindowLimiter;

/// Acknowledgement of an accepted report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportReceipt {
    pub file_id: String,
    pub display_name: String,
    /// Reports the user may still send in the current window
    pub remaining: usize,
}

pub struct ReportService {
    files: Arc<dyn FileRepository>,
    limiter: SlidingWindowLimiter,
}

impl ReportService {
    pub fn new(files: Arc<dyn FileRepository>, limiter: SlidingWindowLimiter) -> Self {
        Self { files, limiter }
    }

    pub fn from_config(files: Arc<dyn FileRepository>, config: &ReportsConfig) -> Self {
        Self::new(
            files,
            SlidingWindowLimiter::new(
                config.max_per_window,
                Duration::from_secs(config.window_secs),
            ),
        )
    }

    /// Records a report from `user_id` about file `file_id`.
    ///
    /// Rejected with `RateLimited` once the user has used up the window; the
    /// rejected attempt does not count against the next window.
    pub async fn report_file(&self, user_id: i64, file_id: &str) -> Result<ReportReceipt, DomainError> {
        let limit = self.limiter.check_and_record(&user_id.to_string()).await;

        if !limit.allowed {
            tracing::warn!(user_id, file_id, "Report rate limit hit");
            return Err(DomainError::rate_limited(
                format!(
                    "At most {} reports per {} minutes",
                    limit.limit,
                    self.limiter.window().as_secs() / 60
                ),
                limit.reset_in_seconds,
            ));
        }

        let record = self
            .files
            .get(file_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("File '{}' not found", file_id)))?;

        tracing::warn!(
            user_id,
            file_id,
            file_name = record.label(),
            "File reported for review"
        );

        Ok(ReportReceipt {
            file_id: record.id.clone(),
            display_name: record.label().to_string(),
            remaining: limit.remaining,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::file::{FileRecord, InMemoryFileRepository, NewFile};
    use crate::domain::taxonomy::LecturePath;

    fn service() -> ReportService {
        let record = FileRecord::create(
            "doc-1",
            NewFile {
                file_id: "tg-1".to_string(),
                display_name: "Slides".to_string(),
                original_name: Some("slides.pdf".to_string()),
                mime_type: None,
                path: LecturePath::new("cs", "term1", "OOP", "L1"),
            },
        );
        let files = Arc::new(InMemoryFileRepository::new().with_records(vec![record]));

        ReportService::from_config(files, &ReportsConfig::default())
    }

    #[tokio::test]
    async fn test_fourth_report_in_window_is_rejected() {
        let service = service();

        for remaining in [2, 1, 0] {
            let receipt = service.report_file(42, "doc-1").await.unwrap();
            assert_eq!(receipt.remaining, remaining);
            assert_eq!(receipt.display_name, "Slides");
        }

        let err = service.report_file(42, "doc-1").await.unwrap_err();
        match err {
            DomainError::RateLimited {
                retry_after_secs, ..
            } => assert!(retry_after_secs > 0),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_other_users_are_unaffected() {
        let service = service();

        for _ in 0..3 {
            service.report_file(42, "doc-1").await.unwrap();
        }

        assert!(service.report_file(7, "doc-1").await.is_ok());
    }

    #[tokio::test]
    async fn test_report_of_missing_file() {
        let err = service().report_file(42, "missing").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }
}
