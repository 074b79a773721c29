//! Search index error types.
//!
//! This module defines the errors surfaced by index publisher operations.

use thiserror::Error;

/// Rejection messages are truncated to this many bytes; Solr error responses
/// can embed the entire offending document.
const MAX_REJECTION_MESSAGE_LEN: usize = 1000;

/// Errors that can occur while publishing to the search index.
#[derive(Debug, Clone, Error)]
pub enum SearchIndexError {
    /// The search backend could not be reached. Safe to retry with backoff.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The backend validated the document and rejected it. Not retryable
    /// without fixing the document.
    #[error("Solr returned an error: {0}")]
    RejectedError(String),
}

impl SearchIndexError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a rejection error, truncating oversized backend messages.
    pub fn rejected(msg: impl Into<String>) -> Self {
        let mut msg = msg.into();
        if msg.len() > MAX_REJECTION_MESSAGE_LEN {
            let mut end = MAX_REJECTION_MESSAGE_LEN;
            while !msg.is_char_boundary(end) {
                end -= 1;
            }
            msg.truncate(end);
        }
        Self::RejectedError(msg)
    }

    /// Whether retrying the operation could succeed without changes.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConnectionError(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_truncates_long_messages() {
        let err = SearchIndexError::rejected("x".repeat(5000));
        match err {
            SearchIndexError::RejectedError(msg) => assert_eq!(msg.len(), 1000),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_rejected_truncation_respects_char_boundaries() {
        // 2-byte code points, so the 1000-byte cut lands mid-character.
        let err = SearchIndexError::rejected("é".repeat(1000));
        match err {
            SearchIndexError::RejectedError(msg) => {
                assert!(msg.len() <= 1000);
                assert!(msg.is_char_boundary(msg.len()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_short_messages_pass_through() {
        let err = SearchIndexError::rejected("missing required field");
        assert_eq!(
            err.to_string(),
            "Solr returned an error: missing required field"
        );
    }

    #[test]
    fn test_retryability() {
        assert!(SearchIndexError::connection("refused").is_retryable());
        assert!(!SearchIndexError::rejected("bad doc").is_retryable());
    }
}
