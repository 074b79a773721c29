//! HTTP implementation of the Solr connection.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, info};
use url::Url;

use crate::errors::SolrError;
use crate::interfaces::SolrConnection;
use catalog_indexer_shared::IndexedDocument;

/// Solr connection over HTTP using the JSON update API.
///
/// Talks to a single core. Adds go to `update/json/docs`; deletes and commits
/// post command bodies to `update`. Timeouts and transport tuning live in the
/// underlying HTTP client, not here.
///
/// # Example
///
/// ```ignore
/// let conn = HttpSolrConnection::new("http://localhost:8983/solr/catalog")?;
/// conn.add(&documents, true).await?;
/// ```
pub struct HttpSolrConnection {
    client: Client,
    base_url: Url,
    url: String,
}

impl HttpSolrConnection {
    /// Create a new connection to the core at `url`.
    ///
    /// # Arguments
    ///
    /// * `url` - The core URL, e.g. `http://localhost:8983/solr/catalog`
    ///
    /// # Returns
    ///
    /// * `Ok(HttpSolrConnection)` - A new connection
    /// * `Err(SolrError::Transport)` - If the URL is invalid or client setup
    ///   fails
    pub fn new(url: &str) -> Result<Self, SolrError> {
        let normalized = if url.ends_with('/') {
            url.to_string()
        } else {
            format!("{}/", url)
        };
        let base_url = Url::parse(&normalized)
            .map_err(|e| SolrError::transport(format!("Invalid Solr URL {}: {}", url, e)))?;

        let client = Client::builder()
            .build()
            .map_err(|e| SolrError::transport(e.to_string()))?;

        info!(url = %url, "Created Solr connection");

        Ok(Self {
            client,
            base_url,
            url: url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, SolrError> {
        self.base_url
            .join(path)
            .map_err(|e| SolrError::transport(e.to_string()))
    }

    async fn post_update(
        &self,
        path: &str,
        query: &[(&str, &str)],
        body: &Value,
    ) -> Result<(), SolrError> {
        let endpoint = self.endpoint(path)?;
        let response = self
            .client
            .post(endpoint)
            .query(query)
            .json(body)
            .send()
            .await
            .map_err(|e| SolrError::transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(SolrError::response(format!(
                "status {}: {}",
                status, error_body
            )));
        }
        Ok(())
    }
}

fn commit_param(commit: bool) -> &'static str {
    if commit {
        "true"
    } else {
        "false"
    }
}

#[async_trait]
impl SolrConnection for HttpSolrConnection {
    fn url(&self) -> &str {
        &self.url
    }

    async fn add(&self, documents: &[IndexedDocument], commit: bool) -> Result<(), SolrError> {
        let body = serde_json::to_value(documents)
            .map_err(|e| SolrError::transport(format!("Could not serialize documents: {}", e)))?;

        self.post_update(
            "update/json/docs",
            &[("commit", commit_param(commit))],
            &body,
        )
        .await?;

        debug!(count = documents.len(), commit = commit, "Added documents");
        Ok(())
    }

    async fn delete_by_query(&self, query: &str, commit: bool) -> Result<(), SolrError> {
        let body = json!({"delete": {"query": query}});
        self.post_update("update", &[("commit", commit_param(commit))], &body)
            .await?;

        debug!(query = %query, commit = commit, "Deleted by query");
        Ok(())
    }

    async fn commit(&self, wait_searcher: bool) -> Result<(), SolrError> {
        let body = json!({"commit": {"waitSearcher": wait_searcher}});
        self.post_update("update", &[], &body).await?;

        debug!(wait_searcher = wait_searcher, "Committed");
        Ok(())
    }

    async fn ping(&self) -> Result<bool, SolrError> {
        let endpoint = self.endpoint("admin/ping")?;
        let response = self
            .client
            .get(endpoint)
            .query(&[("wt", "json")])
            .send()
            .await
            .map_err(|e| SolrError::transport(e.to_string()))?;

        Ok(response.status().is_success())
    }
}
