//! # Catalog Indexer
//!
//! Main library for the catalog search indexer.
//!
//! This crate provides the entry point and configuration wiring for running
//! the indexing pipeline against a Solr backend. The embedding application
//! supplies the catalog-side collaborators (record store, vocabularies,
//! permission labels, hooks) and receives a ready [`DatasetIndexer`].
//!
//! [`DatasetIndexer`]: catalog_indexer_pipeline::DatasetIndexer

pub mod config;

pub use config::{CatalogServices, Dependencies};

use thiserror::Error;

/// Errors that can occur during indexer initialization or execution.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    PipelineError(#[from] catalog_indexer_pipeline::PipelineError),

    /// Search index error.
    #[error("Search index error: {0}")]
    SearchIndexError(#[from] catalog_indexer_repository::SearchIndexError),
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
