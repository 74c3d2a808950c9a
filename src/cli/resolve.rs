//! Resolve command - prints the options stored under a lookup key

use crate::domain::taxonomy::{TaxonomyDocument, TaxonomyDocumentId, TaxonomyRepository};
use crate::infrastructure::storage::StorageFactory;

pub async fn run(doc_id: &str, key: &str) -> anyhow::Result<()> {
    let config = super::bootstrap();

    let doc_id: TaxonomyDocumentId = doc_id.parse()?;
    let repositories = StorageFactory::create(&config.storage).await?;
    let document = repositories.taxonomy.get_document(doc_id.as_str()).await?;

    for option in options(doc_id, &document, key) {
        println!("{}", option);
    }

    Ok(())
}

fn options(doc_id: TaxonomyDocumentId, document: &TaxonomyDocument, key: &str) -> Vec<String> {
    match doc_id {
        TaxonomyDocumentId::Programs => document.programs(),
        _ => document.resolve(key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_programs_ignore_key() {
        let document = TaxonomyDocument::from_value(json!({"list": ["b", "a"], "2022": ["c"]}));

        assert_eq!(
            options(TaxonomyDocumentId::Programs, &document, "ignored"),
            vec!["b", "a", "c"]
        );
    }

    #[test]
    fn test_resolves_merged_key() {
        let document =
            TaxonomyDocument::from_value(json!({"cs_term1": ["Math"], "term1": ["Math", "Physics"]}));

        assert_eq!(
            options(TaxonomyDocumentId::Subjects, &document, "term1"),
            vec!["Math", "Physics"]
        );
    }
}
