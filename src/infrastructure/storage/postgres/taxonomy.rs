use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::postgres::PgPool;
use sqlx::{Postgres, Row, Transaction};

use super::query_error;
use crate::domain::taxonomy::{
    ArrayRemove, TaxonomyDocument, TaxonomyDocumentId, TaxonomyRepository, TaxonomyUpdate,
};
use crate::domain::DomainError;

#[derive(Debug, Clone)]
pub struct PostgresTaxonomyRepository {
    pool: PgPool,
}

impl PostgresTaxonomyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Locks the row for `doc_id`, creating an empty one first if needed
    async fn lock_document(
        tx: &mut Transaction<'_, Postgres>,
        doc_id: TaxonomyDocumentId,
    ) -> Result<TaxonomyDocument, DomainError> {
        sqlx::query(
            "INSERT INTO taxonomy_documents (doc_id, data) VALUES ($1, '{}'::jsonb) ON CONFLICT (doc_id) DO NOTHING",
        )
        .bind(doc_id.as_str())
        .execute(&mut **tx)
        .await
        .map_err(query_error("create taxonomy document"))?;

        let row = sqlx::query("SELECT data FROM taxonomy_documents WHERE doc_id = $1 FOR UPDATE")
            .bind(doc_id.as_str())
            .fetch_one(&mut **tx)
            .await
            .map_err(query_error("lock taxonomy document"))?;

        Ok(TaxonomyDocument::from_value(row.get("data")))
    }

    async fn store_document(
        tx: &mut Transaction<'_, Postgres>,
        doc_id: TaxonomyDocumentId,
        document: TaxonomyDocument,
    ) -> Result<(), DomainError> {
        sqlx::query(
            "UPDATE taxonomy_documents SET data = $2, updated_at = NOW() WHERE doc_id = $1",
        )
        .bind(doc_id.as_str())
        .bind(document.into_value())
        .execute(&mut **tx)
        .await
        .map_err(query_error("write taxonomy document"))?;

        Ok(())
    }

    async fn begin(&self) -> Result<Transaction<'static, Postgres>, DomainError> {
        self.pool
            .begin()
            .await
            .map_err(query_error("begin taxonomy transaction"))
    }
}

#[async_trait]
impl TaxonomyRepository for PostgresTaxonomyRepository {
    async fn get_document(&self, doc_id: &str) -> Result<TaxonomyDocument, DomainError> {
        let row = sqlx::query("SELECT data FROM taxonomy_documents WHERE doc_id = $1")
            .bind(doc_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(query_error("read taxonomy document"))?;

        Ok(row
            .map(|r| TaxonomyDocument::from_value(r.get("data")))
            .unwrap_or_default())
    }

    async fn apply_update(&self, update: &TaxonomyUpdate) -> Result<(), DomainError> {
        if update.is_empty() {
            return Ok(());
        }

        let mut tx = self.begin().await?;
        let mut documents = HashMap::new();

        // Fixed lock order across writers
        let mut ids = update.documents();
        ids.sort();

        for doc_id in &ids {
            let document = Self::lock_document(&mut tx, *doc_id).await?;
            documents.insert(*doc_id, document);
        }

        update.apply_to(&mut documents);

        for (doc_id, document) in documents {
            Self::store_document(&mut tx, doc_id, document).await?;
        }

        tx.commit()
            .await
            .map_err(query_error("commit taxonomy update"))?;

        tracing::info!(documents = ids.len(), "Applied taxonomy update");
        Ok(())
    }

    async fn remove_value(&self, removal: &ArrayRemove) -> Result<bool, DomainError> {
        let mut tx = self.begin().await?;

        let mut document = Self::lock_document(&mut tx, removal.document).await?;
        let removed = removal.apply(&mut document);

        if removed {
            Self::store_document(&mut tx, removal.document, document).await?;
        }

        tx.commit()
            .await
            .map_err(query_error("commit taxonomy removal"))?;

        Ok(removed)
    }

    async fn replace_document(
        &self,
        doc_id: TaxonomyDocumentId,
        document: TaxonomyDocument,
    ) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO taxonomy_documents (doc_id, data)
            VALUES ($1, $2)
            ON CONFLICT (doc_id) DO UPDATE SET data = EXCLUDED.data, updated_at = NOW()
            "#,
        )
        .bind(doc_id.as_str())
        .bind(document.into_value())
        .execute(&self.pool)
        .await
        .map_err(query_error("replace taxonomy document"))?;

        Ok(())
    }
}
