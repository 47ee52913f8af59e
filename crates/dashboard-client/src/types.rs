//! Request and response types for the dashboard API.

use serde::{Deserialize, Serialize};


// ============================================================================
// Health
// ============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
}

// ============================================================================
// Chains & Feeds
// ============================================================================

/// Summary of a configured chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainSummary {
    /// EVM chain id.
    pub chain_id: u64,
    /// Human-readable chain name.
    pub name: String,
    /// Network slug used by the discovery indexer.
    pub network: String,
}

/// Response for listing chains.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainsListResponse {
    /// Configured chains.
    pub chains: Vec<ChainSummary>,
}

/// A feed registry entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedSummary {
    /// Token address (lower-cased).
    pub address: String,
    /// Canonical display symbol.
    pub symbol: String,
    /// Direct-exchange trading symbol, when the token has one.
    pub exchange_symbol: Option<String>,
}

/// Response for listing the feeds of one chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedsListResponse {
    /// Chain id.
    pub chain_id: u64,
    /// Feed entries sorted by symbol.
    pub feeds: Vec<FeedSummary>,
}

// ============================================================================
// Klines
// ============================================================================

/// Query for kline data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KlineRequest {
    /// Chain id.
    pub chain_id: u64,
    /// Base token address.
    pub base: String,
    /// Quote token address.
    pub quote: String,
    /// Candle interval (1m, 5m, 15m, 1h, 4h, 12h, 1d).
    pub interval: String,
    /// Maximum number of candles.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Start timestamp in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<u64>,
    /// End timestamp in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<u64>,
}

impl KlineRequest {
    /// Creates a request with server-side defaults for limit and window.
    #[must_use]
    pub fn new(chain_id: u64, base: &str, quote: &str, interval: &str) -> Self {
        Self {
            chain_id,
            base: base.to_string(),
            quote: quote.to_string(),
            interval: interval.to_string(),
            limit: None,
            start_time: None,
            end_time: None,
        }
    }

    /// Sets the candle limit.
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets an inclusive open-time window in seconds.
    #[must_use]
    pub fn with_window(mut self, start_time: Option<u64>, end_time: Option<u64>) -> Self {
        self.start_time = start_time;
        self.end_time = end_time;
        self
    }
}

/// A single candle. Prices and volume are decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candle {
    /// Candle open time in seconds since epoch.
    pub open_time: u64,
    /// Opening price.
    pub open: String,
    /// Highest price.
    pub high: String,
    /// Lowest price.
    pub low: String,
    /// Closing price.
    pub close: String,
    /// Traded volume.
    pub volume: String,
}

/// Response for the klines endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KlineResponse {
    /// Base token address as requested.
    pub base_address: String,
    /// Quote token address as requested.
    pub quote_address: String,
    /// Chain id.
    pub chain_id: u64,
    /// Resolved base symbol.
    pub base_symbol: String,
    /// Resolved quote symbol.
    pub quote_symbol: String,
    /// Candle interval.
    pub interval: String,
    /// Candles in ascending open time.
    pub candles: Vec<Candle>,
}

// ============================================================================
// Errors
// ============================================================================

/// Error body returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message.
    pub error: String,
    /// Error code.
    pub code: String,
}
