//! HTTP client for the dashboard API.

use crate::error::Error;
use crate::types::*;
use reqwest::Client;
use std::time::Duration;
use url::Url;


/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API (e.g., "http://localhost:8080").
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// HTTP client for the Grid Dashboard API.
#[derive(Debug, Clone)]
pub struct DashboardClient {
    client: Client,
    base_url: String,
}

impl DashboardClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    /// Returns error if the base URL is invalid or the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        Url::parse(&config.base_url)?;
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Creates a new client with default configuration.
    ///
    /// # Errors
    /// Returns error if the base URL is invalid or the HTTP client cannot be built.
    pub fn with_base_url(base_url: &str) -> Result<Self, Error> {
        Self::new(ClientConfig {
            base_url: base_url.to_string(),
            ..Default::default()
        })
    }

    /// Returns the base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ========================================================================
    // Health
    // ========================================================================

    /// Performs a health check.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn health_check(&self) -> Result<HealthResponse, Error> {
        let url = format!("{}/health", self.base_url);
        let resp = self.client.get(&url).send().await?;
        self.handle_response(resp).await
    }

    // ========================================================================
    // Chains & Feeds
    // ========================================================================

    /// Lists configured chains.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn list_chains(&self) -> Result<ChainsListResponse, Error> {
        let url = format!("{}/api/v1/chains", self.base_url);
        let resp = self.client.get(&url).send().await?;
        self.handle_response(resp).await
    }

    /// Lists the token feeds of a chain.
    ///
    /// # Errors
    /// Returns error if the request fails or the chain is unknown.
    pub async fn list_feeds(&self, chain_id: u64) -> Result<FeedsListResponse, Error> {
        let url = format!("{}/api/v1/feeds/{}", self.base_url, chain_id);
        let resp = self.client.get(&url).send().await?;
        self.handle_response(resp).await
    }

    // ========================================================================
    // Klines
    // ========================================================================

    /// Gets candlestick data for a token pair.
    ///
    /// # Errors
    /// Returns [`Error::UpstreamUnavailable`] when the market data upstream
    /// timed out, or another error if the request fails.
    pub async fn get_klines(&self, request: &KlineRequest) -> Result<KlineResponse, Error> {
        let url = self.klines_url(request)?;
        let resp = self.client.get(&url).send().await?;
        self.handle_response(resp).await
    }

    fn klines_url(&self, request: &KlineRequest) -> Result<String, Error> {
        let params = serde_urlencoded::to_string(request)?;
        Ok(format!("{}/api/v1/klines?{}", self.base_url, params))
    }

    // ========================================================================
    // Response Handling
    // ========================================================================

    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();

        if status.is_success() {
            return Ok(resp.json().await?);
        }

        let text = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&text)
            .map(|body| body.error)
            .unwrap_or(text);

        match status.as_u16() {
            400 => Err(Error::InvalidRequest(message)),
            404 => Err(Error::NotFound(message)),
            503 => Err(Error::UpstreamUnavailable(message)),
            code => Err(Error::Api {
                status: code,
                message,
            }),
        }
    }
}
