use reqwest::{Client, StatusCode, header};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::CatalogConfig;
use crate::models::Movie;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to fetch movies: HTTP {0}")]
    Status(StatusCode),

    #[error("Failed to fetch movies: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to decode catalog response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The catalog answered with a success status but flagged the body as a
    /// failure. Carries the message the service supplied, if any.
    #[error("Catalog rejected query: {}", .0.as_deref().unwrap_or("no message"))]
    Rejected(Option<String>),
}

/// Source of movie lists. Implemented by [`TmdbClient`] and by test doubles.
#[async_trait::async_trait]
pub trait MovieCatalog: Send + Sync {
    async fn search(&self, term: &str) -> Result<Vec<Movie>, CatalogError>;

    async fn discover(&self) -> Result<Vec<Movie>, CatalogError>;

    /// Searches for `query`, or lists popular movies when it is empty.
    async fn fetch_movies(&self, query: &str) -> Result<Vec<Movie>, CatalogError> {
        if query.is_empty() {
            self.discover().await
        } else {
            self.search(query).await
        }
    }
}

#[derive(Debug, Deserialize)]
struct MovieListResponse {
    #[serde(default)]
    results: Option<Vec<Movie>>,
    #[serde(rename = "Response", default)]
    response: Option<serde_json::Value>,
    #[serde(rename = "Error", default)]
    error: Option<String>,
}

impl MovieListResponse {
    /// OMDb-style `Response` flag: `false`, `"False"`/`"false"` or `0`.
    /// Other strings, including `"0"` and `""`, are not a rejection.
    fn is_rejected(&self) -> bool {
        match &self.response {
            Some(serde_json::Value::Bool(b)) => !b,
            Some(serde_json::Value::String(s)) => s.eq_ignore_ascii_case("false"),
            Some(serde_json::Value::Number(n)) => n.as_f64() == Some(0.0),
            _ => false,
        }
    }

    fn into_movies(self) -> Result<Vec<Movie>, CatalogError> {
        if self.is_rejected() {
            return Err(CatalogError::Rejected(
                self.error.filter(|e| !e.is_empty()),
            ));
        }
        Ok(self.results.unwrap_or_default())
    }
}

#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: String,
    token: String,
}

impl TmdbClient {
    pub fn new(config: &CatalogConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds.into()))
            .user_agent("Marquee/1.0")
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build catalog HTTP client: {e}"))?;
        Ok(Self::with_shared_client(client, config))
    }

    #[must_use]
    pub fn with_shared_client(client: Client, config: &CatalogConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.api_token.clone(),
        }
    }

    fn search_url(&self, term: &str) -> String {
        format!(
            "{}/search/movie?query={}",
            self.base_url,
            urlencoding::encode(term)
        )
    }

    fn discover_url(&self) -> String {
        format!("{}/discover/movie?sort_by=popularity.desc", self.base_url)
    }

    async fn get_movies(&self, url: &str, endpoint: &'static str) -> Result<Vec<Movie>, CatalogError> {
        debug!(endpoint, "Fetching movies from catalog");

        let result = self.request(url).await;

        let outcome = match &result {
            Ok(_) => "success",
            Err(CatalogError::Rejected(_)) => "rejected",
            Err(_) => "error",
        };
        metrics::counter!(
            "catalog_requests_total",
            "endpoint" => endpoint,
            "outcome" => outcome
        )
        .increment(1);

        result
    }

    async fn request(&self, url: &str) -> Result<Vec<Movie>, CatalogError> {
        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, body = %body, "Catalog API returned an error status");
            return Err(CatalogError::Status(status));
        }

        let bytes = response.bytes().await?;
        let parsed: MovieListResponse = serde_json::from_slice(&bytes)?;
        parsed.into_movies()
    }
}

#[async_trait::async_trait]
impl MovieCatalog for TmdbClient {
    async fn search(&self, term: &str) -> Result<Vec<Movie>, CatalogError> {
        self.get_movies(&self.search_url(term), "search").await
    }

    async fn discover(&self) -> Result<Vec<Movie>, CatalogError> {
        self.get_movies(&self.discover_url(), "discover").await
    }
}
