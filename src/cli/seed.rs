//! Seed command - replaces taxonomy documents from a JSON file

use std::path::Path;

use serde_json::Value;
use tracing::info;

use crate::domain::taxonomy::{TaxonomyDocument, TaxonomyDocumentId};
use crate::domain::DomainError;

pub async fn run(file: &Path) -> anyhow::Result<()> {
    let config = super::bootstrap();

    let raw = tokio::fs::read_to_string(file)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", file.display(), e))?;
    let value: Value = serde_json::from_str(&raw)?;
    let documents = parse_seed(value)?;

    let state = crate::create_app_state_with_config(&config).await?;
    let count = state.catalog.seed(documents).await?;

    info!(file = %file.display(), documents = count, "Seed complete");
    println!("Seeded {} taxonomy document(s)", count);

    Ok(())
}

/// Splits a seed file into documents.
///
/// The file is an object keyed by document id; each value replaces that
/// document wholesale. Unknown ids are rejected before anything is written.
pub fn parse_seed(value: Value) -> Result<Vec<(TaxonomyDocumentId, TaxonomyDocument)>, DomainError> {
    let Value::Object(map) = value else {
        return Err(DomainError::validation(
            "Seed file must be a JSON object keyed by document id",
        ));
    };

    map.into_iter()
        .map(|(doc_id, document)| {
            let doc_id: TaxonomyDocumentId = doc_id.parse()?;

            if !document.is_object() {
                return Err(DomainError::validation(format!(
                    "Document '{}' must be a JSON object",
                    doc_id
                )));
            }

            Ok((doc_id, TaxonomyDocument::from_value(document)))
        })
        .collect()
}
