//! Taxonomy repository trait

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::{ArrayRemove, TaxonomyDocument, TaxonomyDocumentId, TaxonomyUpdate};
use crate::domain::DomainError;

/// Repository for the four taxonomy documents
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TaxonomyRepository: Send + Sync {
    /// Fetches a document by id. An absent document is an empty document,
    /// not an error; errors mean the store could not be read.
    async fn get_document(&self, doc_id: &str) -> Result<TaxonomyDocument, DomainError>;

    /// Applies every union of `update` atomically
    async fn apply_update(&self, update: &TaxonomyUpdate) -> Result<(), DomainError>;

    /// Removes a single value from an array field; returns whether it was present
    async fn remove_value(&self, removal: &ArrayRemove) -> Result<bool, DomainError>;

    /// Overwrites a whole document
    async fn replace_document(
        &self,
        doc_id: TaxonomyDocumentId,
        document: TaxonomyDocument,
    ) -> Result<(), DomainError>;
}

/// In-memory implementation of TaxonomyRepository
pub mod in_memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::RwLock;

    /// In-memory taxonomy repository for testing and development
    #[derive(Debug, Default)]
    pub struct InMemoryTaxonomyRepository {
        documents: RwLock<HashMap<String, TaxonomyDocument>>,
    }

    impl InMemoryTaxonomyRepository {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_document(self, doc_id: TaxonomyDocumentId, document: TaxonomyDocument) -> Self {
            if let Ok(mut documents) = self.documents.write() {
                documents.insert(doc_id.as_str().to_string(), document);
            }
            self
        }
    }

    fn lock_error(e: impl std::fmt::Display) -> DomainError {
        DomainError::storage(format!("Failed to acquire taxonomy lock: {}", e))
    }

    #[async_trait]
    impl TaxonomyRepository for InMemoryTaxonomyRepository {
        async fn get_document(&self, doc_id: &str) -> Result<TaxonomyDocument, DomainError> {
            let documents = self.documents.read().map_err(lock_error)?;
            Ok(documents.get(doc_id).cloned().unwrap_or_default())
        }

        async fn apply_update(&self, update: &TaxonomyUpdate) -> Result<(), DomainError> {
            let mut documents = self.documents.write().map_err(lock_error)?;

            for op in update.operations() {
                documents
                    .entry(op.document.as_str().to_string())
                    .or_default()
                    .union_value(&op.key, &op.value);
            }

            Ok(())
        }

        async fn remove_value(&self, removal: &ArrayRemove) -> Result<bool, DomainError> {
            let mut documents = self.documents.write().map_err(lock_error)?;

            Ok(documents
                .get_mut(removal.document.as_str())
                .map(|document| removal.apply(document))
                .unwrap_or(false))
        }

        async fn replace_document(
            &self,
            doc_id: TaxonomyDocumentId,
            document: TaxonomyDocument,
        ) -> Result<(), DomainError> {
            let mut documents = self.documents.write().map_err(lock_error)?;
            documents.insert(doc_id.as_str().to_string(), document);
            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::domain::taxonomy::LecturePath;
        use serde_json::json;

        #[tokio::test]
        async fn test_absent_document_is_empty() {
            let repo = InMemoryTaxonomyRepository::new();
            let doc = repo.get_document("terms").await.unwrap();
            assert!(doc.is_empty());
        }

        #[tokio::test]
        async fn test_apply_update_and_remove() {
            let repo = InMemoryTaxonomyRepository::new();
            let path = LecturePath::new("cs", "term1", "OOP", "L1");

            repo.apply_update(&TaxonomyUpdate::for_path(&path))
                .await
                .unwrap();

            let lectures = repo.get_document("lectures").await.unwrap();
            assert_eq!(lectures.get("cs_term1_OOP"), Some(&json!(["L1"])));

            let removed = repo.remove_value(&ArrayRemove::lecture(&path)).await.unwrap();
            assert!(removed);

            let lectures = repo.get_document("lectures").await.unwrap();
            assert_eq!(lectures.get("cs_term1_OOP"), Some(&json!([])));
        }

        #[tokio::test]
        async fn test_replace_document() {
            let repo = InMemoryTaxonomyRepository::new().with_document(
                TaxonomyDocumentId::Programs,
                TaxonomyDocument::new().with_list("list", ["ee"]),
            );

            repo.replace_document(
                TaxonomyDocumentId::Programs,
                TaxonomyDocument::new().with_list("list", ["cs"]),
            )
            .await
            .unwrap();

            let programs = repo.get_document("programs").await.unwrap();
            assert_eq!(programs.programs(), vec!["cs"]);
        }
    }
}
