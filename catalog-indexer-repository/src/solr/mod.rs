//! Solr backend implementation.
//!
//! This module provides the concrete implementation of [`SolrConnection`]
//! over Solr's JSON update API.
//!
//! [`SolrConnection`]: crate::interfaces::SolrConnection

mod http_connection;

pub use http_connection::HttpSolrConnection;
