//! Error types for the catalog indexer repository.

mod search_index_error;
mod solr_error;

pub use search_index_error::SearchIndexError;
pub use solr_error::SolrError;
