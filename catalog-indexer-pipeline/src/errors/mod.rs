//! Error types for the catalog indexer pipeline.

use catalog_indexer_repository::SearchIndexError;
use thiserror::Error;

/// Errors that can occur while building or publishing a document.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A required input was missing or malformed. Programmer error; not
    /// worth retrying.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// A referenced related record could not be resolved. May be transient
    /// under concurrent deletion; the caller decides whether to retry.
    #[error("Integrity error: {0}")]
    IntegrityError(String),

    /// A document-mutation hook violated its contract. Fatal for this
    /// indexing attempt.
    #[error("Plugin contract error: {0}")]
    PluginContractError(String),

    /// A record could not be serialized for storage on the document.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Error from the search index publisher.
    #[error("Search index error: {0}")]
    SearchIndexError(#[from] SearchIndexError),
}

impl PipelineError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create an integrity error.
    pub fn integrity(msg: impl Into<String>) -> Self {
        Self::IntegrityError(msg.into())
    }

    /// Create a plugin contract error.
    pub fn plugin_contract(msg: impl Into<String>) -> Self {
        Self::PluginContractError(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }
}
