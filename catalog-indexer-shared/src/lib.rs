//! # Catalog Indexer Shared
//!
//! Shared types and data structures for the catalog search indexer system.
//!
//! This crate defines the typed record model (datasets and their nested
//! resources, tags, groups, and relationships), the flat [`IndexedDocument`]
//! sent to the search backend, and the [`SearchConfig`] recognized by the
//! indexer.

pub mod config;
pub mod document;
pub mod record;

pub use config::SearchConfig;
pub use document::{IndexedDocument, DATASET_ENTITY_TYPE, RESERVED_FIELDS, SOLR_FIELDS, TYPE_FIELD};
pub use record::{
    Dataset, Extra, Group, Organization, Relationship, Resource, Tag, Vocabulary,
};
