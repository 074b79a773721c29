//! Dataset index publishers.
//!
//! [`DatasetSearchIndex`] owns a connection to the search backend and
//! translates its failures into the [`SearchIndexError`] taxonomy.
//! [`NoopSearchIndex`] stands in when indexing is disabled.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};

use crate::errors::{SearchIndexError, SolrError};
use crate::interfaces::{SearchIndex, SolrConnection};
use catalog_indexer_shared::{IndexedDocument, SearchConfig, DATASET_ENTITY_TYPE, TYPE_FIELD};

/// Publisher for dataset documents.
///
/// Each operation runs against a scoped connection and surfaces failures
/// immediately; retry policy belongs to the caller.
pub struct DatasetSearchIndex {
    connection: Arc<dyn SolrConnection>,
    config: SearchConfig,
}

impl DatasetSearchIndex {
    /// Create a publisher over the given connection.
    pub fn new(connection: Arc<dyn SolrConnection>, config: SearchConfig) -> Self {
        Self { connection, config }
    }

    /// Map a connection failure onto the publisher taxonomy, logging backend
    /// context before re-raising.
    fn backend_error(&self, err: SolrError) -> SearchIndexError {
        match err {
            SolrError::Transport(msg) => {
                let mapped = SearchIndexError::connection(format!(
                    "Could not connect to Solr using {}: {}",
                    self.connection.url(),
                    msg
                ));
                error!(url = %self.connection.url(), error = %mapped, "Solr unreachable");
                mapped
            }
            SolrError::Response(msg) => {
                let mapped = SearchIndexError::rejected(msg);
                error!(url = %self.connection.url(), error = %mapped, "Solr rejected request");
                mapped
            }
        }
    }

    fn delete_query(&self, dataset_id: &str) -> String {
        format!(
            "+{}:{} AND +(id:\"{}\" OR name:\"{}\") AND +site_id:\"{}\"",
            TYPE_FIELD, DATASET_ENTITY_TYPE, dataset_id, dataset_id, self.config.site_id
        )
    }
}

#[async_trait]
impl SearchIndex for DatasetSearchIndex {
    async fn update(
        &self,
        document: &IndexedDocument,
        defer_commit: bool,
    ) -> Result<(), SearchIndexError> {
        let commit = self.config.solr_commit && !defer_commit;

        self.connection
            .add(std::slice::from_ref(document), commit)
            .await
            .map_err(|e| self.backend_error(e))?;

        debug!(
            name = document.get_str("name").unwrap_or_default(),
            committed = commit,
            "Updated index"
        );
        Ok(())
    }

    async fn remove(&self, dataset_id: &str) -> Result<(), SearchIndexError> {
        let query = self.delete_query(dataset_id);

        self.connection
            .delete_by_query(&query, self.config.solr_commit)
            .await
            .map_err(|e| self.backend_error(e))?;

        debug!(dataset_id = %dataset_id, "Removed from index");
        Ok(())
    }

    async fn commit(&self) -> Result<(), SearchIndexError> {
        // Any failure here counts as the backend being unavailable; there is
        // no document to reject.
        self.connection.commit(false).await.map_err(|e| {
            let mapped = SearchIndexError::connection(format!(
                "Commit failed against {}: {}",
                self.connection.url(),
                e
            ));
            error!(url = %self.connection.url(), error = %mapped, "Solr commit failed");
            mapped
        })
    }

    async fn clear(&self) -> Result<(), SearchIndexError> {
        let query = format!("+site_id:\"{}\"", self.config.site_id);

        self.connection
            .delete_by_query(&query, false)
            .await
            .map_err(|e| self.backend_error(e))?;
        self.connection
            .commit(true)
            .await
            .map_err(|e| self.backend_error(e))?;

        debug!(site_id = %self.config.site_id, "Cleared index");
        Ok(())
    }
}

/// Publisher used when indexing is disabled.
///
/// Document writes and removals log and do nothing; clearing the index still
/// genuinely clears it.
pub struct NoopSearchIndex {
    inner: DatasetSearchIndex,
}

impl NoopSearchIndex {
    /// Create a noop publisher. The connection is only used by
    /// [`clear`](SearchIndex::clear).
    pub fn new(connection: Arc<dyn SolrConnection>, config: SearchConfig) -> Self {
        Self {
            inner: DatasetSearchIndex::new(connection, config),
        }
    }
}

#[async_trait]
impl SearchIndex for NoopSearchIndex {
    async fn update(
        &self,
        document: &IndexedDocument,
        _defer_commit: bool,
    ) -> Result<(), SearchIndexError> {
        debug!(
            fields = %document.field_names().collect::<Vec<_>>().join(","),
            "NOOP Index"
        );
        Ok(())
    }

    async fn remove(&self, dataset_id: &str) -> Result<(), SearchIndexError> {
        debug!(dataset_id = %dataset_id, "NOOP Delete");
        Ok(())
    }

    async fn commit(&self) -> Result<(), SearchIndexError> {
        Ok(())
    }

    async fn clear(&self) -> Result<(), SearchIndexError> {
        self.inner.clear().await
    }
}
