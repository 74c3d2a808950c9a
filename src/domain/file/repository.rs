//! File repository trait

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::{FileRecord, FileSummary};
use crate::domain::taxonomy::LecturePath;
use crate::domain::DomainError;

/// Sentinel appended to a prefix to form the upper bound of a range query
pub const PREFIX_RANGE_END: char = '\u{f8ff}';

/// Maximum number of hits returned by a prefix search
pub const SEARCH_LIMIT: usize = 200;

/// Repository for file metadata records
#[cfg_attr(test, automock)]
#[async_trait]
pub trait FileRepository: Send + Sync {
    /// Finds a record by id
    async fn get(&self, id: &str) -> Result<Option<FileRecord>, DomainError>;

    /// Records whose program, term, subject and lecture all equal `path`
    async fn find_by_path(&self, path: &LecturePath) -> Result<Vec<FileRecord>, DomainError>;

    /// Records whose `name_lower` lies in `[prefix, prefix + '\u{f8ff}']`,
    /// at most `limit` of them, ordered by `name_lower`
    async fn search_prefix(
        &self,
        prefix: &str,
        limit: usize,
    ) -> Result<Vec<FileSummary>, DomainError>;

    /// Stores a new record
    async fn create(&self, record: FileRecord) -> Result<FileRecord, DomainError>;

    /// Replaces an existing record
    async fn update(&self, record: FileRecord) -> Result<FileRecord, DomainError>;

    /// Deletes a record; returns whether it existed
    async fn delete(&self, id: &str) -> Result<bool, DomainError>;

    /// Deletes several records in one batch; returns how many existed
    async fn delete_many(&self, ids: &[String]) -> Result<usize, DomainError>;
}

/// Upper bound of the prefix range for `prefix`
pub fn prefix_upper_bound(prefix: &str) -> String {
    let mut upper = String::with_capacity(prefix.len() + PREFIX_RANGE_END.len_utf8());
    upper.push_str(prefix);
    upper.push(PREFIX_RANGE_END);
    upper
}

/// Whether `name_lower` falls within the range searched for `prefix`
pub fn in_prefix_range(name_lower: &str, prefix: &str, upper: &str) -> bool {
    name_lower >= prefix && name_lower <= upper
}

/// Records on `path`, oldest first
pub fn records_on_path<'a>(
    records: impl Iterator<Item = &'a FileRecord>,
    path: &LecturePath,
) -> Vec<FileRecord> {
    let mut found: Vec<FileRecord> = records.filter(|r| &r.path == path).cloned().collect();
    found.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
    found
}

/// Prefix search over a record scan, ordered by `name_lower`
pub fn records_with_prefix<'a>(
    records: impl Iterator<Item = &'a FileRecord>,
    prefix: &str,
    limit: usize,
) -> Vec<FileSummary> {
    let upper = prefix_upper_bound(prefix);

    let mut hits: Vec<&FileRecord> = records
        .filter(|r| in_prefix_range(&r.name_lower, prefix, &upper))
        .collect();
    hits.sort_by(|a, b| a.name_lower.cmp(&b.name_lower).then(a.id.cmp(&b.id)));

    hits.into_iter().take(limit).map(FileRecord::summary).collect()
}

/// In-memory implementation of FileRepository
pub mod in_memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::RwLock;

    /// In-memory file repository for testing and development
    #[derive(Debug, Default)]
    pub struct InMemoryFileRepository {
        records: RwLock<HashMap<String, FileRecord>>,
    }

    impl InMemoryFileRepository {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_records(self, records: Vec<FileRecord>) -> Self {
            if let Ok(mut map) = self.records.write() {
                for record in records {
                    map.insert(record.id.clone(), record);
                }
            }
            self
        }
    }

    fn lock_error(e: impl std::fmt::Display) -> DomainError {
        DomainError::storage(format!("Failed to acquire file lock: {}", e))
    }

    #[async_trait]
    impl FileRepository for InMemoryFileRepository {
        async fn get(&self, id: &str) -> Result<Option<FileRecord>, DomainError> {
            let records = self.records.read().map_err(lock_error)?;
            Ok(records.get(id).cloned())
        }

        async fn find_by_path(&self, path: &LecturePath) -> Result<Vec<FileRecord>, DomainError> {
            let records = self.records.read().map_err(lock_error)?;
            Ok(records_on_path(records.values(), path))
        }

        async fn search_prefix(
            &self,
            prefix: &str,
            limit: usize,
        ) -> Result<Vec<FileSummary>, DomainError> {
            let records = self.records.read().map_err(lock_error)?;
            Ok(records_with_prefix(records.values(), prefix, limit))
        }

        async fn create(&self, record: FileRecord) -> Result<FileRecord, DomainError> {
            let mut records = self.records.write().map_err(lock_error)?;

            if records.contains_key(&record.id) {
                return Err(DomainError::conflict(format!(
                    "File '{}' already exists",
                    record.id
                )));
            }

            records.insert(record.id.clone(), record.clone());
            Ok(record)
        }

        async fn update(&self, record: FileRecord) -> Result<FileRecord, DomainError> {
            let mut records = self.records.write().map_err(lock_error)?;

            if !records.contains_key(&record.id) {
                return Err(DomainError::not_found(format!(
                    "File '{}' not found",
                    record.id
                )));
            }

            records.insert(record.id.clone(), record.clone());
            Ok(record)
        }

        async fn delete(&self, id: &str) -> Result<bool, DomainError> {
            let mut records = self.records.write().map_err(lock_error)?;
            Ok(records.remove(id).is_some())
        }

        async fn delete_many(&self, ids: &[String]) -> Result<usize, DomainError> {
            let mut records = self.records.write().map_err(lock_error)?;
            Ok(ids.iter().filter(|id| records.remove(*id).is_some()).count())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::domain::file::NewFile;

        fn record(id: &str, name: &str, lecture: &str) -> FileRecord {
            FileRecord::create(
                id,
                NewFile {
                    file_id: format!("tg-{}", id),
                    display_name: name.to_string(),
                    original_name: Some(format!("{}.pdf", id)),
                    mime_type: None,
                    path: LecturePath::new("cs", "term1", "OOP", lecture),
                },
            )
        }

        fn repo() -> InMemoryFileRepository {
            InMemoryFileRepository::new().with_records(vec![
                record("a", "Operating Systems", "L1"),
                record("b", "Optics", "L1"),
                record("c", "Networks", "L2"),
            ])
        }

        #[tokio::test]
        async fn test_find_by_path_exact_match() {
            let repo = repo();

            let files = repo
                .find_by_path(&LecturePath::new("cs", "term1", "OOP", "L1"))
                .await
                .unwrap();
            assert_eq!(files.len(), 2);

            let none = repo
                .find_by_path(&LecturePath::new("cs", "term2", "OOP", "L1"))
                .await
                .unwrap();
            assert!(none.is_empty());
        }

        #[tokio::test]
        async fn test_search_prefix() {
            let repo = repo();

            let hits = repo.search_prefix("op", SEARCH_LIMIT).await.unwrap();
            let names: Vec<_> = hits.iter().map(|h| h.display_name.as_str()).collect();
            assert_eq!(names, vec!["Operating Systems", "Optics"]);

            let limited = repo.search_prefix("op", 1).await.unwrap();
            assert_eq!(limited.len(), 1);

            assert!(repo.search_prefix("zz", SEARCH_LIMIT).await.unwrap().is_empty());
        }

        #[tokio::test]
        async fn test_create_conflict_and_update_missing() {
            let repo = repo();

            let err = repo.create(record("a", "dup", "L1")).await.unwrap_err();
            assert!(matches!(err, DomainError::Conflict { .. }));

            let err = repo.update(record("zz", "missing", "L1")).await.unwrap_err();
            assert!(matches!(err, DomainError::NotFound { .. }));
        }

        #[tokio::test]
        async fn test_delete_many() {
            let repo = repo();

            let deleted = repo
                .delete_many(&["a".to_string(), "c".to_string(), "nope".to_string()])
                .await
                .unwrap();
            assert_eq!(deleted, 2);
            assert!(repo.get("a").await.unwrap().is_none());
            assert!(repo.get("b").await.unwrap().is_some());
        }
    }
}
