//! Indexer module for the catalog indexer pipeline.
//!
//! Dispatches build outcomes to the search index and drives deferred-commit
//! batches.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::builder::{BuildOutcome, DocumentBuilder};
use crate::errors::PipelineError;
use catalog_indexer_repository::SearchIndex;
use catalog_indexer_shared::Dataset;

/// Drives records through the builder and into the search index.
///
/// Each call is synchronous with respect to the backend round-trip; callers
/// wanting concurrency run independent calls for different records.
pub struct DatasetIndexer {
    builder: DocumentBuilder,
    index: Arc<dyn SearchIndex>,
}

impl DatasetIndexer {
    /// Create an indexer over the given builder and publisher.
    pub fn new(builder: DocumentBuilder, index: Arc<dyn SearchIndex>) -> Self {
        Self { builder, index }
    }

    /// Build and publish one record.
    ///
    /// A record whose state asks for removal is deleted from the index
    /// instead of being published.
    ///
    /// # Arguments
    ///
    /// * `dataset` - The raw record
    /// * `validated` - Its schema-validated form
    /// * `defer_commit` - Publish without forcing an immediate backend commit
    #[instrument(skip_all, fields(dataset_id = %dataset.id))]
    pub async fn index_dataset(
        &self,
        dataset: &Dataset,
        validated: Option<&Dataset>,
        defer_commit: bool,
    ) -> Result<(), PipelineError> {
        match self.builder.build(dataset, validated)? {
            BuildOutcome::Index(document) => {
                self.index.update(&document, defer_commit).await?;
                debug!(defer_commit = defer_commit, "Published document");
            }
            BuildOutcome::Remove => {
                self.index.remove(&dataset.id).await?;
                debug!("Removed instead of indexing");
            }
        }
        Ok(())
    }

    /// Publish a batch of records with deferred commits and one trailing
    /// commit.
    ///
    /// Stops at the first failure without issuing the trailing commit; the
    /// documents already sent may become visible whenever the backend next
    /// commits, so callers deciding to salvage a partial batch call
    /// [`commit`](Self::commit) themselves.
    ///
    /// # Returns
    ///
    /// The number of records published.
    pub async fn index_batch(&self, records: &[(Dataset, Dataset)]) -> Result<usize, PipelineError> {
        for (dataset, validated) in records {
            self.index_dataset(dataset, Some(validated), true).await?;
        }
        self.index.commit().await?;

        info!(count = records.len(), "Indexed batch");
        Ok(records.len())
    }

    /// Delete the index entry for a record.
    pub async fn remove_dataset(&self, dataset_id: &str) -> Result<(), PipelineError> {
        self.index.remove(dataset_id).await?;
        Ok(())
    }

    /// Force a backend commit.
    pub async fn commit(&self) -> Result<(), PipelineError> {
        self.index.commit().await?;
        Ok(())
    }
}
