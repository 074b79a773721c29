//! Search index publisher trait definition.

use async_trait::async_trait;

use crate::errors::SearchIndexError;
use catalog_indexer_shared::IndexedDocument;

/// Publisher operations against the search index for one entity type.
///
/// A search index handles the management of documents in the backend, but no
/// queries. Implementations translate backend-specific failures into
/// [`SearchIndexError`]; no retries happen at this layer.
///
/// Batch callers publish each document with `defer_commit = true` and issue a
/// single trailing [`commit`](SearchIndex::commit). Writes made before a
/// record's deferred commit are observed by that commit; no cross-record
/// ordering is guaranteed.
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Insert a new document. Equivalent to an update with an immediate
    /// commit.
    async fn insert(&self, document: &IndexedDocument) -> Result<(), SearchIndexError> {
        self.update(document, false).await
    }

    /// Add or replace a document.
    ///
    /// # Arguments
    ///
    /// * `document` - The flat document to publish
    /// * `defer_commit` - Skip the immediate commit; the caller will commit
    ///   later. Auto-commit may also be disabled globally by configuration.
    ///
    /// # Returns
    ///
    /// * `Err(SearchIndexError::ConnectionError)` - Transport failure
    /// * `Err(SearchIndexError::RejectedError)` - Backend rejected the
    ///   document
    async fn update(
        &self,
        document: &IndexedDocument,
        defer_commit: bool,
    ) -> Result<(), SearchIndexError>;

    /// Delete the index entry for the dataset with the given identifier.
    async fn remove(&self, dataset_id: &str) -> Result<(), SearchIndexError>;

    /// Force a backend commit without waiting for searcher warm-up.
    async fn commit(&self) -> Result<(), SearchIndexError>;

    /// Delete every document belonging to this site, then commit.
    async fn clear(&self) -> Result<(), SearchIndexError>;
}
