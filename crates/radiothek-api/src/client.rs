//! Catalog HTTP client.

use reqwest::Client;
use tracing::debug;

use crate::error::ApiError;
use crate::types::{BroadcastRecord, SearchResponse};

/// Search endpoint of the FM4 catalog.
pub const FM4_SEARCH_URL: &str = "https://audioapi.orf.at/fm4/api/json/current/search";

/// Client for the catalog's search and broadcast-detail endpoints.
///
/// Each operation performs exactly one GET and decodes the full body.
/// Errors are fatal to the operation in progress; there is no retry at
/// this layer.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: Client,
    search_url: String,
}

impl CatalogClient {
    pub fn new(search_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), search_url)
    }

    /// Build against an existing reqwest client (tests point this at a
    /// local fixture server).
    pub fn with_client(http: Client, search_url: impl Into<String>) -> Self {
        Self {
            http,
            search_url: search_url.into(),
        }
    }

    /// Run a free-text search against the catalog.
    ///
    /// A response with zero hits is not an error: when the catalog supplied
    /// spelling suggestions they are present in `suggest` and the caller
    /// decides what to do with them.
    pub async fn search(&self, term: &str) -> Result<SearchResponse, ApiError> {
        debug!("searching catalog for {term:?}");
        self.get_json(&self.search_url, &[("q", term)]).await
    }

    /// Fetch a broadcast detail document by the href of a search hit.
    pub async fn broadcast(&self, href: &str) -> Result<BroadcastRecord, ApiError> {
        debug!("fetching broadcast {href}");
        self.get_json(href, &[]).await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let mut request = self.http.get(url);
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })
    }
}
