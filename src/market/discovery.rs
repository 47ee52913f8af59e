//! Discovery-based candle client for tokens without a direct-exchange symbol.
//!
//! Two calls against a GeckoTerminal-compatible pair indexer:
//!
//! ```text
//! GET /networks/{network}/tokens/{address}/pools           -> most liquid pool
//! GET /networks/{network}/pools/{pool}/ohlcv/{timeframe}   -> candles, newest first
//! ```

use crate::config::DiscoveryConfig;
use crate::market::error::{UpstreamError, truncate_body};
use crate::market::normalize::{RowLayout, apply_window, normalize_rows};
use crate::market::registry::FeedRegistry;
use crate::models::{Candle, KlineInterval};
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const UPSTREAM: &str = "discovery indexer";

#[derive(Debug, Deserialize)]
struct PoolsResponse {
    data: Vec<PoolData>,
}

#[derive(Debug, Deserialize)]
struct PoolData {
    attributes: PoolAttributes,
}

#[derive(Debug, Deserialize)]
struct PoolAttributes {
    address: String,
}

#[derive(Debug, Deserialize)]
struct OhlcvResponse {
    data: OhlcvData,
}

#[derive(Debug, Deserialize)]
struct OhlcvData {
    attributes: OhlcvAttributes,
}

#[derive(Debug, Deserialize)]
struct OhlcvAttributes {
    ohlcv_list: Vec<Vec<Value>>,
}

/// Fetches candles by first discovering a token's most liquid pool.
#[derive(Debug, Clone)]
pub struct DiscoveryFetcher {
    client: Client,
    base_url: String,
    timeout: Duration,
    registry: Arc<FeedRegistry>,
}

impl DiscoveryFetcher {
    /// Creates a fetcher from configuration.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: &DiscoveryConfig, registry: Arc<FeedRegistry>) -> Result<Self, UpstreamError> {
        let timeout = config.timeout();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(UpstreamError::Transport)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout,
            registry,
        })
    }

    /// Fetches candles for `token_address` on `chain_id`.
    ///
    /// Window and limit semantics match the direct-exchange path: bounds are
    /// inclusive on open time, a start bound keeps the earliest `limit`
    /// candles, otherwise the latest `limit` are kept.
    ///
    /// # Errors
    /// Returns error if the chain is unknown, no pool is found, or either
    /// upstream call fails.
    pub async fn fetch(
        &self,
        chain_id: u64,
        token_address: &str,
        interval: KlineInterval,
        limit: u32,
        start_time: Option<u64>,
        end_time: Option<u64>,
    ) -> Result<Vec<Candle>, UpstreamError> {
        let network = self
            .registry
            .chain(chain_id)
            .map(|c| c.network.as_str())
            .ok_or(UpstreamError::UnsupportedChain(chain_id))?;

        let pool = self.discover_pool(network, chain_id, token_address).await?;
        debug!(chain_id, token_address, pool = %pool, "discovered trading venue");

        let before = upper_bound(interval, limit, start_time, end_time)
            .map(|bound| bound.saturating_add(1));
        let rows = self
            .fetch_ohlcv(network, &pool, interval, limit, before)
            .await?;

        let candles = normalize_rows(&rows, RowLayout::INDEXER)?;
        Ok(apply_window(candles, start_time, end_time, limit as usize))
    }

    async fn discover_pool(
        &self,
        network: &str,
        chain_id: u64,
        token_address: &str,
    ) -> Result<String, UpstreamError> {
        let url = format!(
            "{}/networks/{}/tokens/{}/pools",
            self.base_url, network, token_address
        );
        let pools: PoolsResponse = self.get_json(&url, &[("page", "1".to_string())]).await?;

        pools
            .data
            .into_iter()
            .next()
            .map(|pool| pool.attributes.address)
            .ok_or_else(|| UpstreamError::NoVenue {
                chain_id,
                token: token_address.to_string(),
            })
    }

    async fn fetch_ohlcv(
        &self,
        network: &str,
        pool: &str,
        interval: KlineInterval,
        limit: u32,
        before_timestamp: Option<u64>,
    ) -> Result<Vec<Vec<Value>>, UpstreamError> {
        let (timeframe, aggregate) = interval.discovery_timeframe();
        let url = format!(
            "{}/networks/{}/pools/{}/ohlcv/{}",
            self.base_url, network, pool, timeframe
        );

        let mut params = vec![
            ("aggregate", aggregate.to_string()),
            ("limit", limit.to_string()),
            ("currency", "usd".to_string()),
            ("token", "base".to_string()),
        ];
        if let Some(before) = before_timestamp {
            params.push(("before_timestamp", before.to_string()));
        }

        let ohlcv: OhlcvResponse = self.get_json(&url, &params).await?;
        Ok(ohlcv.data.attributes.ohlcv_list)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<T, UpstreamError> {
        let resp = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .query(params)
            .send()
            .await
            .map_err(|e| UpstreamError::from_transport(e, UPSTREAM, self.timeout))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body: truncate_body(body),
            });
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| UpstreamError::from_transport(e, UPSTREAM, self.timeout))?;
        serde_json::from_slice(&bytes).map_err(|e| UpstreamError::Decode(e.to_string()))
    }
}

/// Inclusive upper bound on open time for the OHLCV request.
///
/// The indexer only pages backwards from a bound, so a start bound becomes
/// the end of the `limit`-candle span beginning at start.
fn upper_bound(
    interval: KlineInterval,
    limit: u32,
    start_time: Option<u64>,
    end_time: Option<u64>,
) -> Option<u64> {
    let span = u64::from(limit).saturating_mul(interval.seconds());
    let from_start = start_time.map(|start| start.saturating_add(span.saturating_sub(1)));
    match (from_start, end_time) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}
