use async_trait::async_trait;
use moka::future::Cache;
use moka::policy::EvictionPolicy;
use std::sync::Arc;
use std::time::Duration;

use crate::config::CacheConfig;
use crate::domain::taxonomy::{
    ArrayRemove, TaxonomyDocument, TaxonomyDocumentId, TaxonomyRepository, TaxonomyUpdate,
};
use crate::domain::DomainError;

pub const DEFAULT_TAXONOMY_TTL: Duration = Duration::from_secs(300);
pub const DEFAULT_TAXONOMY_MAX_ENTRIES: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxonomyCacheConfig {
    pub ttl: Duration,
    pub max_entries: u64,
}

impl Default for TaxonomyCacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TAXONOMY_TTL,
            max_entries: DEFAULT_TAXONOMY_MAX_ENTRIES,
        }
    }
}

impl From<&CacheConfig> for TaxonomyCacheConfig {
    fn from(config: &CacheConfig) -> Self {
        Self {
            ttl: Duration::from_secs(config.taxonomy_ttl_secs),
            max_entries: config.taxonomy_max_entries,
        }
    }
}

/// Process-wide cache over whichever backend is configured
pub type TaxonomyCache = CachedTaxonomyRepository<dyn TaxonomyRepository>;

/// Taxonomy repository wrapper that caches documents by id with a TTL.
///
/// Writes go straight to the inner repository and leave cached entries in
/// place, so readers see changes once the entry expires.
pub struct CachedTaxonomyRepository<R: TaxonomyRepository + ?Sized> {
    inner: Arc<R>,
    cache: Cache<String, Arc<TaxonomyDocument>>,
}

impl<R: TaxonomyRepository + ?Sized> CachedTaxonomyRepository<R> {
    pub fn new(inner: Arc<R>) -> Self {
        Self::with_config(inner, TaxonomyCacheConfig::default())
    }

    pub fn with_config(inner: Arc<R>, config: TaxonomyCacheConfig) -> Self {
        let cache = Cache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_entries)
            .eviction_policy(EvictionPolicy::lru())
            .build();

        Self { inner, cache }
    }

    /// Cached document, fetching and storing it on a miss.
    ///
    /// Empty documents are cached like any other; failed fetches are not.
    pub async fn get_or_fetch(&self, doc_id: &str) -> Result<Arc<TaxonomyDocument>, DomainError> {
        if let Some(cached) = self.cache.get(doc_id).await {
            tracing::debug!(doc_id, "Taxonomy cache hit");
            return Ok(cached);
        }

        tracing::debug!(doc_id, "Taxonomy cache miss, fetching document");

        let document = match self.inner.get_document(doc_id).await {
            Ok(document) => Arc::new(document),
            Err(e) => {
                tracing::error!(doc_id, error = %e, "Failed to fetch taxonomy document");
                return Err(e);
            }
        };

        self.cache
            .insert(doc_id.to_string(), Arc::clone(&document))
            .await;

        Ok(document)
    }

    /// Invalidate a specific document
    pub async fn invalidate(&self, doc_id: &str) {
        self.cache.invalidate(doc_id).await;
    }

    /// Invalidate all cached documents
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    pub fn cache_size(&self) -> u64 {
        self.cache.entry_count()
    }

    pub fn inner(&self) -> &Arc<R> {
        &self.inner
    }

    #[cfg(test)]
    async fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks().await;
    }

    #[cfg(test)]
    fn contains(&self, doc_id: &str) -> bool {
        self.cache.contains_key(doc_id)
    }
}

#[async_trait]
impl<R: TaxonomyRepository + ?Sized> TaxonomyRepository for CachedTaxonomyRepository<R> {
    async fn get_document(&self, doc_id: &str) -> Result<TaxonomyDocument, DomainError> {
        let document = self.get_or_fetch(doc_id).await?;
        Ok((*document).clone())
    }

    async fn apply_update(&self, update: &TaxonomyUpdate) -> Result<(), DomainError> {
        self.inner.apply_update(update).await
    }

    async fn remove_value(&self, removal: &ArrayRemove) -> Result<bool, DomainError> {
        self.inner.remove_value(removal).await
    }

    async fn replace_document(
        &self,
        doc_id: TaxonomyDocumentId,
        document: TaxonomyDocument,
    ) -> Result<(), DomainError> {
        self.inner.replace_document(doc_id, document).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::taxonomy::{InMemoryTaxonomyRepository, MockTaxonomyRepository};
    use crate::domain::taxonomy::LecturePath;
    use serde_json::json;

    fn terms_document() -> TaxonomyDocument {
        TaxonomyDocument::from_value(json!({ "cs": ["term1", "term2"] }))
    }

    #[tokio::test]
    async fn test_second_read_within_ttl_is_served_from_cache() {
        let mut mock = MockTaxonomyRepository::new();
        mock.expect_get_document()
            .withf(|doc_id| doc_id == "terms")
            .times(1)
            .returning(|_| Ok(terms_document()));

        let cached = CachedTaxonomyRepository::new(Arc::new(mock));

        let first = cached.get_or_fetch("terms").await.unwrap();
        let second = cached.get_or_fetch("terms").await.unwrap();

        assert_eq!(first.resolve("cs"), vec!["term1", "term2"]);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_expired_entry_is_fetched_again() {
        let mut mock = MockTaxonomyRepository::new();
        mock.expect_get_document()
            .times(2)
            .returning(|_| Ok(terms_document()));

        let cached = CachedTaxonomyRepository::with_config(
            Arc::new(mock),
            TaxonomyCacheConfig {
                ttl: Duration::from_millis(100),
                max_entries: 10,
            },
        );

        cached.get_or_fetch("terms").await.unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        cached.get_or_fetch("terms").await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_documents_are_cached() {
        let mut mock = MockTaxonomyRepository::new();
        mock.expect_get_document()
            .times(1)
            .returning(|_| Ok(TaxonomyDocument::new()));

        let cached = CachedTaxonomyRepository::new(Arc::new(mock));

        assert!(cached.get_or_fetch("missing").await.unwrap().is_empty());
        assert!(cached.get_or_fetch("missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_fetch_is_not_cached() {
        let mut mock = MockTaxonomyRepository::new();
        let mut seq = mockall::Sequence::new();
        mock.expect_get_document()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(DomainError::storage("store unreachable")));
        mock.expect_get_document()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(terms_document()));

        let cached = CachedTaxonomyRepository::new(Arc::new(mock));

        let err = cached.get_or_fetch("terms").await.unwrap_err();
        assert!(err.is_storage());

        let document = cached.get_or_fetch("terms").await.unwrap();
        assert!(!document.is_empty());
    }

    #[tokio::test]
    async fn test_least_recently_used_entry_is_evicted() {
        let mut mock = MockTaxonomyRepository::new();
        mock.expect_get_document()
            .returning(|_| Ok(TaxonomyDocument::new()));

        let cached = CachedTaxonomyRepository::new(Arc::new(mock));

        for i in 0..100 {
            cached.get_or_fetch(&format!("doc-{}", i)).await.unwrap();
        }
        cached.run_pending_tasks().await;

        cached.get_or_fetch("doc-0").await.unwrap();
        cached.run_pending_tasks().await;

        cached.get_or_fetch("doc-100").await.unwrap();
        cached.run_pending_tasks().await;

        assert_eq!(cached.cache_size(), 100);
        assert!(cached.contains("doc-0"));
        assert!(cached.contains("doc-100"));
        assert!(!cached.contains("doc-1"));
    }

    #[tokio::test]
    async fn test_writes_do_not_invalidate() {
        let repo = Arc::new(InMemoryTaxonomyRepository::new());
        let cached = CachedTaxonomyRepository::new(Arc::clone(&repo));

        assert!(cached.get_or_fetch("programs").await.unwrap().is_empty());

        cached
            .apply_update(&TaxonomyUpdate::for_path(&LecturePath::new("cs", "term1", "OOP", "L1")))
            .await
            .unwrap();

        assert!(cached.get_or_fetch("programs").await.unwrap().is_empty());

        cached.invalidate("programs").await;
        assert_eq!(
            cached.get_or_fetch("programs").await.unwrap().programs(),
            vec!["cs"]
        );
    }
}
