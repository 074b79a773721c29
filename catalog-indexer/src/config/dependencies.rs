//! Dependency initialization and wiring for the catalog indexer.

use std::env;
use std::sync::Arc;
use tracing::info;

use crate::IndexingError;
use catalog_indexer_pipeline::{
    interfaces::{DatasetLookup, IndexDocumentHook, PermissionLabelProvider, VocabularyLookup},
    DatasetIndexer, DocumentBuilder,
};
use catalog_indexer_repository::{
    DatasetSearchIndex, HttpSolrConnection, NoopSearchIndex, SearchIndex, SolrConnection,
};
use catalog_indexer_shared::SearchConfig;

/// Default Solr core URL.
const DEFAULT_SOLR_URL: &str = "http://localhost:8983/solr/catalog";

/// Default site identifier.
const DEFAULT_SITE_ID: &str = "default";

/// Catalog-side collaborators supplied by the embedding application.
pub struct CatalogServices {
    pub datasets: Arc<dyn DatasetLookup>,
    pub vocabularies: Arc<dyn VocabularyLookup>,
    pub labels: Arc<dyn PermissionLabelProvider>,
    /// Document-mutation hooks, applied in order.
    pub hooks: Vec<Arc<dyn IndexDocumentHook>>,
}

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured indexer ready to process records.
    pub indexer: DatasetIndexer,
    /// The publisher, for direct commit/clear access.
    pub index: Arc<dyn SearchIndex>,
    /// The resolved configuration.
    pub config: SearchConfig,
}

impl Dependencies {
    /// Initialize all dependencies from environment variables.
    ///
    /// Loads a `.env` file when one is present.
    ///
    /// # Environment Variables
    ///
    /// - `SOLR_URL`: Solr core URL (default: http://localhost:8983/solr/catalog)
    /// - `SITE_ID`: Identifier of this catalog instance (default: default)
    /// - `SOLR_COMMIT`: Auto-commit after each operation (default: true)
    /// - `REMOVE_DELETED_DATASETS`: Remove stateless/deleted records instead
    ///   of indexing them (default: false)
    /// - `EXTRA_RESOURCE_FIELDS`: Comma-separated resource columns to flatten
    ///   (default: none)
    /// - `SEARCH_INDEXING_ENABLED`: When false, writes become no-ops but
    ///   clearing still works (default: true)
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(IndexingError)` - If configuration is malformed or the backend
    ///   is unreachable
    pub async fn new(services: CatalogServices) -> Result<Self, IndexingError> {
        dotenv::dotenv().ok();

        let solr_url = env::var("SOLR_URL").unwrap_or_else(|_| DEFAULT_SOLR_URL.to_string());
        let site_id = env::var("SITE_ID").unwrap_or_else(|_| DEFAULT_SITE_ID.to_string());
        let solr_commit = env_flag("SOLR_COMMIT", true)?;
        let remove_deleted = env_flag("REMOVE_DELETED_DATASETS", false)?;
        let indexing_enabled = env_flag("SEARCH_INDEXING_ENABLED", true)?;
        let extra_resource_fields = env::var("EXTRA_RESOURCE_FIELDS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|column| !column.is_empty())
                    .map(ToString::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let config = SearchConfig {
            site_id,
            solr_commit,
            remove_deleted_datasets: remove_deleted,
            extra_resource_fields,
        };

        info!(
            solr_url = %solr_url,
            site_id = %config.site_id,
            indexing_enabled = indexing_enabled,
            "Initializing dependencies"
        );

        let connection = HttpSolrConnection::new(&solr_url)
            .map_err(|e| IndexingError::config(format!("Failed to create Solr connection: {}", e)))?;
        let connection: Arc<dyn SolrConnection> = Arc::new(connection);

        // Verify the backend is reachable before handing anything out.
        let healthy = connection
            .ping()
            .await
            .map_err(|e| IndexingError::config(format!("Solr ping failed: {}", e)))?;
        if !healthy {
            return Err(IndexingError::config("Solr core reported itself unhealthy"));
        }

        info!("Solr connection verified");

        let index: Arc<dyn SearchIndex> = if indexing_enabled {
            Arc::new(DatasetSearchIndex::new(connection, config.clone()))
        } else {
            Arc::new(NoopSearchIndex::new(connection, config.clone()))
        };

        let builder = DocumentBuilder::new(
            config.clone(),
            services.datasets,
            services.vocabularies,
            services.labels,
        )
        .with_hooks(services.hooks);

        let indexer = DatasetIndexer::new(builder, index.clone());

        Ok(Self {
            indexer,
            index,
            config,
        })
    }
}

/// Read a boolean environment variable with a default.
fn env_flag(name: &str, default: bool) -> Result<bool, IndexingError> {
    match env::var(name) {
        Ok(raw) => parse_flag(&raw).ok_or_else(|| {
            IndexingError::config(format!("{} must be a boolean, got {:?}", name, raw))
        }),
        Err(_) => Ok(default),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
