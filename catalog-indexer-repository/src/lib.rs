//! # Catalog Indexer Repository
//!
//! This crate provides traits and implementations for publishing indexed
//! documents to the search backend. It includes definitions for errors, the
//! connection and publisher interfaces, a concrete Solr HTTP connection, and
//! the dataset index publishers.

pub mod dataset_index;
pub mod errors;
pub mod interfaces;
pub mod solr;

pub use dataset_index::{DatasetSearchIndex, NoopSearchIndex};
pub use errors::{SearchIndexError, SolrError};
pub use interfaces::{SearchIndex, SolrConnection};
pub use solr::HttpSolrConnection;
