//! Configuration recognized by the indexing pipeline and publisher.

use serde::{Deserialize, Serialize};

/// Configuration for the catalog search indexer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Identifier of this catalog instance; stamped on every document and
    /// scoping every delete query.
    pub site_id: String,
    /// Whether backend operations commit automatically. When false, nothing
    /// commits until an explicit commit call.
    pub solr_commit: bool,
    /// Whether records with an absent or `deleted` state are removed from the
    /// index instead of being indexed.
    pub remove_deleted_datasets: bool,
    /// Backend-specific resource columns projected into `res_extras_<column>`
    /// fields during resource flattening.
    pub extra_resource_fields: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            site_id: "default".to_string(),
            solr_commit: true,
            remove_deleted_datasets: false,
            extra_resource_fields: Vec::new(),
        }
    }
}

impl SearchConfig {
    /// Create a config for the given site with defaults for everything else.
    pub fn new(site_id: impl Into<String>) -> Self {
        Self {
            site_id: site_id.into(),
            ..Self::default()
        }
    }

    /// Disable automatic commits.
    pub fn without_auto_commit(mut self) -> Self {
        self.solr_commit = false;
        self
    }

    /// Remove records with an absent or `deleted` state instead of indexing.
    pub fn removing_deleted_datasets(mut self) -> Self {
        self.remove_deleted_datasets = true;
        self
    }

    /// Set the backend-specific resource columns to flatten.
    pub fn with_extra_resource_fields(mut self, fields: Vec<String>) -> Self {
        self.extra_resource_fields = fields;
        self
    }
}
