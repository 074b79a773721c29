//! # Catalog Indexer Pipeline
//!
//! This crate provides the pipeline components for turning dataset records
//! into flat search documents and publishing them.
//!
//! ## Architecture
//!
//! The pipeline follows the Builder-Publisher pattern:
//!
//! 1. **Builder**: Flattens a record (plus its schema-validated form) into an
//!    indexable document, or decides the record should be removed instead.
//! 2. **Indexer**: Dispatches the build outcome to the search index,
//!    supporting deferred commits for batch throughput.
//!
//! Collaborators the pipeline depends on (record store, vocabularies,
//! permission labels, document-mutation hooks) are injected as traits.

pub mod builder;
pub mod errors;
pub mod indexer;
pub mod interfaces;

pub use builder::{BuildOutcome, DocumentBuilder};
pub use errors::PipelineError;
pub use indexer::DatasetIndexer;
