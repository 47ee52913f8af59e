//! Token metadata lookup backed by the pair-indexing API.

use crate::config::{DiscoveryConfig, MetadataConfig};
use crate::market::error::{UpstreamError, truncate_body};
use crate::market::registry::FeedRegistry;
use crate::market::symbol::TokenMetadata;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

const UPSTREAM: &str = "token metadata";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    data: TokenData,
}

#[derive(Debug, Deserialize)]
struct TokenData {
    attributes: TokenAttributes,
}

#[derive(Debug, Deserialize)]
struct TokenAttributes {
    #[serde(default)]
    symbol: Option<String>,
}

/// Resolves token symbols through `GET /networks/{network}/tokens/{address}`.
#[derive(Debug, Clone)]
pub struct IndexerTokenMetadata {
    client: Client,
    base_url: String,
    timeout: Duration,
    registry: Arc<FeedRegistry>,
}

impl IndexerTokenMetadata {
    /// Creates a lookup client sharing the discovery indexer's base URL.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(
        discovery: &DiscoveryConfig,
        metadata: &MetadataConfig,
        registry: Arc<FeedRegistry>,
    ) -> Result<Self, UpstreamError> {
        let timeout = metadata.timeout();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(UpstreamError::Transport)?;

        Ok(Self {
            client,
            base_url: discovery.base_url.trim_end_matches('/').to_string(),
            timeout,
            registry,
        })
    }
}

#[async_trait]
impl TokenMetadata for IndexerTokenMetadata {
    async fn token_symbol(
        &self,
        chain_id: u64,
        address: &str,
    ) -> Result<Option<String>, UpstreamError> {
        let chain = self
            .registry
            .chain(chain_id)
            .ok_or(UpstreamError::UnsupportedChain(chain_id))?;
        let url = format!(
            "{}/networks/{}/tokens/{}",
            self.base_url, chain.network, address
        );

        let resp = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| UpstreamError::from_transport(e, UPSTREAM, self.timeout))?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body: truncate_body(body),
            });
        }

        let token: TokenResponse = resp
            .json()
            .await
            .map_err(|e| UpstreamError::Decode(e.to_string()))?;
        Ok(token.data.attributes.symbol.filter(|s| !s.is_empty()))
    }
}
