//! Connection-level Solr error types.

use thiserror::Error;

/// Errors reported by a Solr connection.
///
/// The two variants separate failures that never reached the backend from
/// failures the backend itself reported; the publisher maps them onto its own
/// error taxonomy.
#[derive(Debug, Clone, Error)]
pub enum SolrError {
    /// The request never produced a response (connection refused, timeout,
    /// DNS failure, malformed URL).
    #[error("Transport error: {0}")]
    Transport(String),

    /// Solr answered with a non-success response; carries the response body.
    #[error("Solr error response: {0}")]
    Response(String),
}

impl SolrError {
    /// Create a transport error.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create an error-response error.
    pub fn response(msg: impl Into<String>) -> Self {
        Self::Response(msg.into())
    }
}
