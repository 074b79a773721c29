//! Builder module for the catalog indexer pipeline.
//!
//! Flattens dataset records into indexable documents.

mod dates;
mod document_builder;
mod text;

pub use document_builder::{BuildOutcome, DocumentBuilder};
