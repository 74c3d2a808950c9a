use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use async_trait::async_trait;

use super::JsonFile;
use crate::domain::taxonomy::{
    ArrayRemove, TaxonomyDocument, TaxonomyDocumentId, TaxonomyRepository, TaxonomyUpdate,
};
use crate::domain::DomainError;

const FILE_NAME: &str = "taxonomy.json";

/// All four taxonomy documents in one file, so an update is a single rewrite
#[derive(Debug)]
pub struct JsonTaxonomyRepository {
    file: JsonFile<BTreeMap<String, TaxonomyDocument>>,
}

impl JsonTaxonomyRepository {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            file: JsonFile::new(data_dir.as_ref().join(FILE_NAME)),
        }
    }
}

#[async_trait]
impl TaxonomyRepository for JsonTaxonomyRepository {
    async fn get_document(&self, doc_id: &str) -> Result<TaxonomyDocument, DomainError> {
        let mut documents = self.file.read().await?;
        Ok(documents.remove(doc_id).unwrap_or_default())
    }

    async fn apply_update(&self, update: &TaxonomyUpdate) -> Result<(), DomainError> {
        if update.is_empty() {
            return Ok(());
        }

        let update = update.clone();

        self.file
            .modify(move |stored| {
                let mut touched: HashMap<TaxonomyDocumentId, TaxonomyDocument> = update
                    .documents()
                    .into_iter()
                    .map(|id| (id, stored.remove(id.as_str()).unwrap_or_default()))
                    .collect();

                update.apply_to(&mut touched);

                for (id, document) in touched {
                    stored.insert(id.as_str().to_string(), document);
                }

                Ok(((), true))
            })
            .await
    }

    async fn remove_value(&self, removal: &ArrayRemove) -> Result<bool, DomainError> {
        let removal = removal.clone();

        self.file
            .modify(move |stored| {
                let removed = stored
                    .get_mut(removal.document.as_str())
                    .map(|document| removal.apply(document))
                    .unwrap_or(false);

                Ok((removed, removed))
            })
            .await
    }

    async fn replace_document(
        &self,
        doc_id: TaxonomyDocumentId,
        document: TaxonomyDocument,
    ) -> Result<(), DomainError> {
        self.file
            .modify(move |stored| {
                stored.insert(doc_id.as_str().to_string(), document);
                Ok(((), true))
            })
            .await
    }
}
