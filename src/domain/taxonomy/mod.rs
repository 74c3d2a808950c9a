//! Taxonomy domain - documents, option resolution and compound keys

mod document;
mod path;
mod repository;
pub mod resolver;
mod update;

pub use document::{TaxonomyDocument, TaxonomyDocumentId, PROGRAM_LIST_KEY};
pub use path::{build_lookup_key, LecturePath, TaxonomyLevel, TaxonomyPath, KEY_SEPARATOR};
pub use repository::in_memory::InMemoryTaxonomyRepository;
pub use repository::TaxonomyRepository;
pub use resolver::{extract_programs, resolve_options};
pub use update::{ArrayRemove, ArrayUnion, TaxonomyUpdate};

#[cfg(test)]
pub use repository::MockTaxonomyRepository;
