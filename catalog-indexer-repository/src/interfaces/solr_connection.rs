//! Solr connection trait definition.
//!
//! This module defines the boundary to the search backend itself: a
//! connection object exposing add, delete, and commit operations. The
//! publisher is written against this trait so tests can substitute a
//! recording double and deployments can swap transports.

use async_trait::async_trait;

use crate::errors::SolrError;
use catalog_indexer_shared::IndexedDocument;

/// A scoped connection to one Solr core.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`. A connection is not shared between
/// concurrent indexing calls beyond its own lifetime; callers acquire one per
/// operation through the publisher.
#[async_trait]
pub trait SolrConnection: Send + Sync {
    /// Base URL of the core this connection talks to, for error context.
    fn url(&self) -> &str;

    /// Add (or replace) the given documents.
    ///
    /// # Arguments
    ///
    /// * `documents` - Flat documents to send
    /// * `commit` - Whether the backend should commit immediately
    async fn add(&self, documents: &[IndexedDocument], commit: bool) -> Result<(), SolrError>;

    /// Delete every document matching a textual query.
    ///
    /// Queries use Solr syntax: `field:"value"` clauses joined with `AND`,
    /// `+` prefix for required clauses.
    async fn delete_by_query(&self, query: &str, commit: bool) -> Result<(), SolrError>;

    /// Force a commit.
    ///
    /// # Arguments
    ///
    /// * `wait_searcher` - Whether to block until a new searcher is warmed
    async fn commit(&self, wait_searcher: bool) -> Result<(), SolrError>;

    /// Check whether the backend is reachable and answering.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The core responded to a ping
    /// * `Ok(false)` - The core answered but reported itself unhealthy
    /// * `Err(SolrError)` - The ping could not be delivered
    async fn ping(&self) -> Result<bool, SolrError>;
}
