//! Taxonomy write operations

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::document::{TaxonomyDocument, TaxonomyDocumentId, PROGRAM_LIST_KEY};
use super::path::{LecturePath, TaxonomyLevel};

/// Adds `value` to the array under `key` in `document` unless already present
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrayUnion {
    pub document: TaxonomyDocumentId,
    pub key: String,
    pub value: String,
}

/// Removes `value` from the array under `key` in `document`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrayRemove {
    pub document: TaxonomyDocumentId,
    pub key: String,
    pub value: String,
}

impl ArrayRemove {
    /// Removal of a lecture from its subject's lecture list
    pub fn lecture(path: &LecturePath) -> Self {
        Self {
            document: TaxonomyDocumentId::Lectures,
            key: path.key_for(TaxonomyLevel::Subject),
            value: path.lecture.clone(),
        }
    }

    pub fn apply(&self, document: &mut TaxonomyDocument) -> bool {
        document.remove_value(&self.key, &self.value)
    }
}

/// A set of array unions applied atomically across taxonomy documents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyUpdate {
    operations: Vec<ArrayUnion>,
}

impl TaxonomyUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every level of `path` in the program-centric layout:
    /// `programs.list`, `terms[program]`, `subjects[program_term]` and
    /// `lectures[program_term_subject]`.
    pub fn for_path(path: &LecturePath) -> Self {
        Self::new()
            .with_union(
                TaxonomyDocumentId::Programs,
                PROGRAM_LIST_KEY,
                path.program.clone(),
            )
            .with_union(
                TaxonomyDocumentId::Terms,
                path.key_for(TaxonomyLevel::Program),
                path.term.clone(),
            )
            .with_union(
                TaxonomyDocumentId::Subjects,
                path.key_for(TaxonomyLevel::Term),
                path.subject.clone(),
            )
            .with_union(
                TaxonomyDocumentId::Lectures,
                path.key_for(TaxonomyLevel::Subject),
                path.lecture.clone(),
            )
    }

    pub fn with_union(
        mut self,
        document: TaxonomyDocumentId,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.operations.push(ArrayUnion {
            document,
            key: key.into(),
            value: value.into(),
        });
        self
    }

    pub fn operations(&self) -> &[ArrayUnion] {
        &self.operations
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Documents touched by this update, each listed once
    pub fn documents(&self) -> Vec<TaxonomyDocumentId> {
        let mut ids = Vec::new();

        for op in &self.operations {
            if !ids.contains(&op.document) {
                ids.push(op.document);
            }
        }

        ids
    }

    /// Applies every union to the given documents, creating missing ones
    pub fn apply_to(&self, documents: &mut HashMap<TaxonomyDocumentId, TaxonomyDocument>) {
        for op in &self.operations {
            documents
                .entry(op.document)
                .or_default()
                .union_value(&op.key, &op.value);
        }
    }
}
