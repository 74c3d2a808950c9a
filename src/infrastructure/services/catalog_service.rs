//! Catalog service - file curation, search and taxonomy inspection

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::domain::file::{
    normalize_name, validate_file_update, validate_lecture_path, validate_new_file, FileRecord,
    FileRepository, FileSummary, FileUpdate, NewFile, SEARCH_LIMIT,
};
use crate::domain::taxonomy::{
    build_lookup_key, ArrayRemove, LecturePath, TaxonomyDocument, TaxonomyDocumentId,
    TaxonomyLevel, TaxonomyPath, TaxonomyRepository, TaxonomyUpdate,
};
use crate::domain::DomainError;
use crate::infrastructure::cache::TaxonomyCache;

/// Minimum query length for inline searches
pub const INLINE_SEARCH_MIN_CHARS: usize = 3;

/// Outcome of a lecture deletion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LectureDeletion {
    pub deleted_files: usize,
    pub lecture_removed: bool,
}

/// Coordinates file records with the taxonomy documents that index them
pub struct CatalogService {
    files: Arc<dyn FileRepository>,
    taxonomy: Arc<dyn TaxonomyRepository>,
    cache: Arc<TaxonomyCache>,
}

impl CatalogService {
    /// `taxonomy` is the uncached store; reads for navigation go through `cache`
    pub fn new(
        files: Arc<dyn FileRepository>,
        taxonomy: Arc<dyn TaxonomyRepository>,
        cache: Arc<TaxonomyCache>,
    ) -> Self {
        Self {
            files,
            taxonomy,
            cache,
        }
    }

    pub async fn get_file(&self, id: &str) -> Result<Option<FileRecord>, DomainError> {
        self.files.get(id).await
    }

    pub async fn get_file_required(&self, id: &str) -> Result<FileRecord, DomainError> {
        self.get_file(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("File '{}' not found", id)))
    }

    /// Files stored on an exact lecture path
    pub async fn files_on_path(&self, path: &LecturePath) -> Result<Vec<FileRecord>, DomainError> {
        self.files.find_by_path(path).await
    }

    /// Prefix search on lower-cased display names.
    ///
    /// The query is trimmed and lower-cased; an empty query matches nothing.
    /// Hits without a chat file id are dropped.
    pub async fn search_files(&self, query: &str) -> Result<Vec<FileSummary>, DomainError> {
        let prefix = normalize_name(query);

        if prefix.is_empty() {
            return Ok(Vec::new());
        }

        let hits = self.files.search_prefix(&prefix, SEARCH_LIMIT).await?;

        Ok(hits.into_iter().filter(|h| h.file_id.is_some()).collect())
    }

    /// Search for the chat's inline mode, which ignores short queries
    pub async fn search_inline(&self, query: &str) -> Result<Vec<FileSummary>, DomainError> {
        if query.trim().chars().count() < INLINE_SEARCH_MIN_CHARS {
            return Ok(Vec::new());
        }

        self.search_files(query).await
    }

    /// Validates and stores a new file, then registers its path in the taxonomy
    pub async fn create_file(&self, new_file: NewFile) -> Result<FileRecord, DomainError> {
        validate_new_file(&new_file)?;

        let record = FileRecord::create(Uuid::new_v4().to_string(), new_file);
        let record = self.files.create(record).await?;

        self.taxonomy
            .apply_update(&TaxonomyUpdate::for_path(&record.path))
            .await?;

        tracing::info!(
            file_id = %record.id,
            program = %record.path.program,
            lecture = %record.path.lecture,
            "File created"
        );

        Ok(record)
    }

    /// Applies a partial update; a moved file also registers its new path
    pub async fn update_file(&self, id: &str, update: FileUpdate) -> Result<FileRecord, DomainError> {
        validate_file_update(&update)?;

        let mut record = self.get_file_required(id).await?;
        let previous_path = record.path.clone();

        record.apply(&update);
        let record = self.files.update(record).await?;

        if record.path != previous_path {
            self.taxonomy
                .apply_update(&TaxonomyUpdate::for_path(&record.path))
                .await?;
        }

        tracing::info!(file_id = %record.id, "File updated");

        Ok(record)
    }

    pub async fn delete_file(&self, id: &str) -> Result<(), DomainError> {
        if !self.files.delete(id).await? {
            return Err(DomainError::not_found(format!("File '{}' not found", id)));
        }

        tracing::info!(file_id = %id, "File deleted");
        Ok(())
    }

    /// Deletes every file on `path` in one batch, then drops the lecture
    /// from its subject's lecture list
    pub async fn delete_lecture(&self, path: &LecturePath) -> Result<LectureDeletion, DomainError> {
        validate_lecture_path(path)?;

        let ids: Vec<String> = self
            .files
            .find_by_path(path)
            .await?
            .into_iter()
            .map(|r| r.id)
            .collect();

        let deleted_files = self.files.delete_many(&ids).await?;
        let lecture_removed = self.taxonomy.remove_value(&ArrayRemove::lecture(path)).await?;

        tracing::info!(
            program = %path.program,
            subject = %path.subject,
            lecture = %path.lecture,
            deleted_files,
            "Lecture deleted"
        );

        Ok(LectureDeletion {
            deleted_files,
            lecture_removed,
        })
    }

    /// Raw document straight from the store, bypassing the cache
    pub async fn raw_document(&self, doc_id: &str) -> Result<TaxonomyDocument, DomainError> {
        self.taxonomy.get_document(doc_id).await
    }

    /// Options at `level` given the choices above it in `path`, read through the cache
    pub async fn options(
        &self,
        path: &TaxonomyPath,
        level: TaxonomyLevel,
    ) -> Result<Vec<String>, DomainError> {
        let Some(parent) = level.previous() else {
            let programs = self
                .cache
                .get_or_fetch(TaxonomyDocumentId::Programs.as_str())
                .await?;
            return Ok(programs.programs());
        };

        let doc_id = match parent.child_document() {
            Some(doc_id) => doc_id,
            None => return Ok(Vec::new()),
        };

        let document = self.cache.get_or_fetch(doc_id.as_str()).await?;
        Ok(document.resolve(&build_lookup_key(path, parent)))
    }

    /// Replaces taxonomy documents wholesale and drops their cached copies
    pub async fn seed(
        &self,
        documents: Vec<(TaxonomyDocumentId, TaxonomyDocument)>,
    ) -> Result<usize, DomainError> {
        let count = documents.len();

        for (doc_id, document) in documents {
            self.taxonomy.replace_document(doc_id, document).await?;
            self.cache.invalidate(doc_id.as_str()).await;
        }

        tracing::info!(documents = count, "Taxonomy seeded");
        Ok(count)
    }

    /// Drops one cached document, or all of them
    pub async fn flush_cache(&self, doc_id: Option<&str>) {
        match doc_id {
            Some(doc_id) => self.cache.invalidate(doc_id).await,
            None => self.cache.invalidate_all(),
        }

        tracing::info!(doc_id = doc_id.unwrap_or("*"), "Taxonomy cache flushed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::file::{InMemoryFileRepository, MockFileRepository};
    use crate::domain::taxonomy::InMemoryTaxonomyRepository;
    use crate::infrastructure::cache::CachedTaxonomyRepository;
    use serde_json::json;

    fn service_with(
        files: Arc<dyn FileRepository>,
        taxonomy: Arc<dyn TaxonomyRepository>,
    ) -> CatalogService {
        let cache = Arc::new(CachedTaxonomyRepository::new(Arc::clone(&taxonomy)));
        CatalogService::new(files, taxonomy, cache)
    }

    fn service() -> CatalogService {
        service_with(
            Arc::new(InMemoryFileRepository::new()),
            Arc::new(InMemoryTaxonomyRepository::new()),
        )
    }

    fn new_file(name: &str, lecture: &str) -> NewFile {
        NewFile {
            file_id: format!("tg-{}", name),
            display_name: name.to_string(),
            original_name: Some(format!("{}.pdf", name)),
            mime_type: None,
            path: LecturePath::new("cs", "term1", "OOP", lecture),
        }
    }

    #[tokio::test]
    async fn test_create_file_registers_taxonomy() {
        let service = service();

        let record = service.create_file(new_file("Classes", "L1")).await.unwrap();
        assert_eq!(record.name_lower, "classes");

        let programs = service.raw_document("programs").await.unwrap();
        let subjects = service.raw_document("subjects").await.unwrap();
        let lectures = service.raw_document("lectures").await.unwrap();

        assert_eq!(programs.programs(), vec!["cs"]);
        assert_eq!(subjects.resolve("cs_term1"), vec!["OOP"]);
        assert_eq!(lectures.resolve("cs_term1_OOP"), vec!["L1"]);
    }

    #[tokio::test]
    async fn test_create_file_rejects_invalid_input() {
        let service = service();

        let mut file = new_file("Classes", "L1");
        file.original_name = Some("virus.exe".to_string());
        let err = service.create_file(file).await.unwrap_err();

        assert!(matches!(err, DomainError::Validation { .. }));
        assert!(service.raw_document("programs").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_store_skips_taxonomy_update() {
        let mut files = MockFileRepository::new();
        files
            .expect_create()
            .times(1)
            .returning(|_| Err(DomainError::storage("disk full")));

        let service = service_with(Arc::new(files), Arc::new(InMemoryTaxonomyRepository::new()));

        let err = service.create_file(new_file("Classes", "L1")).await.unwrap_err();
        assert!(err.is_storage());
        assert!(service.raw_document("lectures").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_normalizes_and_skips_missing_file_ids() {
        let service = service();
        service.create_file(new_file("Graphs", "L1")).await.unwrap();
        let orphan = service.create_file(new_file("Greedy", "L1")).await.unwrap();

        let mut stripped = orphan.clone();
        stripped.file_id = None;
        service.files.update(stripped).await.unwrap();

        let hits = service.search_files("  GR ").await.unwrap();
        let names: Vec<_> = hits.iter().map(|h| h.display_name.as_str()).collect();
        assert_eq!(names, vec!["Graphs"]);

        assert!(service.search_files("   ").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_inline_search_minimum_length() {
        let service = service();
        service.create_file(new_file("Graphs", "L1")).await.unwrap();

        assert!(service.search_inline("gr").await.unwrap().is_empty());
        assert_eq!(service.search_inline("gra").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_moving_file_registers_new_path() {
        let service = service();
        let record = service.create_file(new_file("Graphs", "L1")).await.unwrap();

        let updated = service
            .update_file(
                &record.id,
                FileUpdate {
                    display_name: Some("Graph Theory".to_string()),
                    path: Some(LecturePath::new("cs", "term2", "Algorithms", "L4")),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name_lower, "graph theory");

        let lectures = service.raw_document("lectures").await.unwrap();
        assert_eq!(lectures.resolve("cs_term2_Algorithms"), vec!["L4"]);
    }

    #[tokio::test]
    async fn test_update_missing_file() {
        let err = service()
            .update_file("nope", FileUpdate::default())
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_lecture_removes_files_and_taxonomy_entry() {
        let service = service();
        service.create_file(new_file("A", "L1")).await.unwrap();
        service.create_file(new_file("B", "L1")).await.unwrap();
        let other = service.create_file(new_file("C", "L2")).await.unwrap();

        let path = LecturePath::new("cs", "term1", "OOP", "L1");
        let deletion = service.delete_lecture(&path).await.unwrap();

        assert_eq!(
            deletion,
            LectureDeletion {
                deleted_files: 2,
                lecture_removed: true
            }
        );
        assert!(service.files_on_path(&path).await.unwrap().is_empty());
        assert!(service.get_file(&other.id).await.unwrap().is_some());

        let lectures = service.raw_document("lectures").await.unwrap();
        assert_eq!(lectures.resolve("cs_term1_OOP"), vec!["L2"]);
    }

    #[tokio::test]
    async fn test_delete_missing_file_is_not_found() {
        let err = service().delete_file("nope").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_options_per_level() {
        let taxonomy: Arc<dyn TaxonomyRepository> = Arc::new(
            InMemoryTaxonomyRepository::new()
                .with_document(
                    TaxonomyDocumentId::Programs,
                    TaxonomyDocument::from_value(json!({"list": ["cs"], "year1": ["math"]})),
                )
                .with_document(
                    TaxonomyDocumentId::Subjects,
                    TaxonomyDocument::from_value(
                        json!({"cs_term1": ["Math"], "term1": ["Math", "Physics"]}),
                    ),
                ),
        );
        let service = service_with(Arc::new(InMemoryFileRepository::new()), taxonomy);

        let root = TaxonomyPath::new();
        assert_eq!(
            service.options(&root, TaxonomyLevel::Program).await.unwrap(),
            vec!["cs", "math"]
        );

        let path = TaxonomyPath::new()
            .with(TaxonomyLevel::Program, "cs")
            .with(TaxonomyLevel::Term, "term1");
        assert_eq!(
            service.options(&path, TaxonomyLevel::Subject).await.unwrap(),
            vec!["Math"]
        );
    }

    #[tokio::test]
    async fn test_seed_invalidates_cached_documents() {
        let service = service();
        let root = TaxonomyPath::new();

        assert!(service.options(&root, TaxonomyLevel::Program).await.unwrap().is_empty());

        service
            .seed(vec![(
                TaxonomyDocumentId::Programs,
                TaxonomyDocument::new().with_list("list", ["cs", "med"]),
            )])
            .await
            .unwrap();

        assert_eq!(
            service.options(&root, TaxonomyLevel::Program).await.unwrap(),
            vec!["cs", "med"]
        );
    }
}
