//! Interface definitions for the search backend.
//!
//! This module defines the abstract [`SolrConnection`] and [`SearchIndex`]
//! traits that allow for dependency injection and swappable backend
//! implementations.

mod search_index;
mod solr_connection;

pub use search_index::SearchIndex;
pub use solr_connection::SolrConnection;
