//! Read-through caching for taxonomy documents

mod taxonomy;

pub use taxonomy::{
    CachedTaxonomyRepository, TaxonomyCache, TaxonomyCacheConfig, DEFAULT_TAXONOMY_MAX_ENTRIES,
    DEFAULT_TAXONOMY_TTL,
};
