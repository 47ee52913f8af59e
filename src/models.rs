//! Request and response models for the REST API.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Default number of candles returned when the caller gives no limit.
pub const DEFAULT_KLINE_LIMIT: u32 = 500;

/// Upper bound on candles per request, shared by every upstream.
pub const MAX_KLINE_LIMIT: u32 = 1000;

// ============================================================================
// Health
// ============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
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
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChainSummary {
    /// EVM chain id.
    pub chain_id: u64,
    /// Human-readable chain name.
    pub name: String,
    /// Network slug used by the discovery indexer.
    pub network: String,
}

/// Response for listing chains.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChainsListResponse {
    /// Configured chains.
    pub chains: Vec<ChainSummary>,
}

/// A feed registry entry as exposed over the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FeedSummary {
    /// Token address (lower-cased).
    pub address: String,
    /// Canonical display symbol.
    pub symbol: String,
    /// Direct-exchange trading symbol, when the token has one.
    pub exchange_symbol: Option<String>,
}

/// Response for listing the feeds of one chain.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FeedsListResponse {
    /// Chain id.
    pub chain_id: u64,
    /// Feed entries sorted by symbol.
    pub feeds: Vec<FeedSummary>,
}

// ============================================================================
// Kline (Candlestick) Data Types
// ============================================================================

/// Candle interval supported by every upstream source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum KlineInterval {
    /// 1 minute candles.
    #[serde(rename = "1m")]
    OneMinute,
    /// 5 minute candles.
    #[serde(rename = "5m")]
    FiveMinutes,
    /// 15 minute candles.
    #[serde(rename = "15m")]
    FifteenMinutes,
    /// 1 hour candles.
    #[serde(rename = "1h")]
    OneHour,
    /// 4 hour candles.
    #[serde(rename = "4h")]
    FourHours,
    /// 12 hour candles.
    #[serde(rename = "12h")]
    TwelveHours,
    /// 1 day candles.
    #[serde(rename = "1d")]
    OneDay,
}

impl KlineInterval {
    /// Returns the interval duration in seconds.
    #[must_use]
    pub fn seconds(&self) -> u64 {
        match self {
            Self::OneMinute => 60,
            Self::FiveMinutes => 300,
            Self::FifteenMinutes => 900,
            Self::OneHour => 3600,
            Self::FourHours => 14400,
            Self::TwelveHours => 43200,
            Self::OneDay => 86400,
        }
    }

    /// Interval code as understood by the direct exchange (`"1h"`, `"1d"`, ...).
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneMinute => "1m",
            Self::FiveMinutes => "5m",
            Self::FifteenMinutes => "15m",
            Self::OneHour => "1h",
            Self::FourHours => "4h",
            Self::TwelveHours => "12h",
            Self::OneDay => "1d",
        }
    }

    /// Timeframe and aggregate pair used by the discovery indexer.
    #[must_use]
    pub fn discovery_timeframe(&self) -> (&'static str, u32) {
        match self {
            Self::OneMinute => ("minute", 1),
            Self::FiveMinutes => ("minute", 5),
            Self::FifteenMinutes => ("minute", 15),
            Self::OneHour => ("hour", 1),
            Self::FourHours => ("hour", 4),
            Self::TwelveHours => ("hour", 12),
            Self::OneDay => ("day", 1),
        }
    }
}

impl std::fmt::Display for KlineInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for KlineInterval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1m" => Ok(Self::OneMinute),
            "5m" => Ok(Self::FiveMinutes),
            "15m" => Ok(Self::FifteenMinutes),
            "1h" => Ok(Self::OneHour),
            "4h" => Ok(Self::FourHours),
            "12h" => Ok(Self::TwelveHours),
            "1d" => Ok(Self::OneDay),
            _ => Err(format!(
                "Invalid interval: {}. Use 1m, 5m, 15m, 1h, 4h, 12h, or 1d",
                s
            )),
        }
    }
}

/// A single normalized candle.
///
/// Prices and volume travel as decimal strings so that tokens with very
/// small unit prices keep every significant digit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
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

/// A validated kline request as handed to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KlineQuery {
    /// Chain id.
    pub chain_id: u64,
    /// Base token address.
    pub base_address: String,
    /// Quote token address.
    pub quote_address: String,
    /// Candle interval.
    pub interval: KlineInterval,
    /// Maximum number of candles.
    pub limit: u32,
    /// Inclusive lower bound on open time, in seconds.
    pub start_time: Option<u64>,
    /// Inclusive upper bound on open time, in seconds.
    pub end_time: Option<u64>,
}

/// Query parameters for the klines endpoint.
#[derive(Debug, Deserialize, ToSchema)]
pub struct KlineParams {
    /// Chain id.
    pub chain_id: u64,
    /// Base token address.
    pub base: String,
    /// Quote token address.
    pub quote: String,
    /// Candle interval (1m, 5m, 15m, 1h, 4h, 12h, 1d).
    pub interval: String,
    /// Maximum number of candles (default 500, max 1000).
    #[serde(default)]
    pub limit: Option<u32>,
    /// Start timestamp in seconds (optional).
    #[serde(default)]
    pub start_time: Option<u64>,
    /// End timestamp in seconds (optional).
    #[serde(default)]
    pub end_time: Option<u64>,
}

/// Response for the klines endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct KlineResult {
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
    pub interval: KlineInterval,
    /// Candles in ascending open time.
    pub candles: Vec<Candle>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kline_interval_parsing() {
        assert_eq!(
            "1m".parse::<KlineInterval>().unwrap(),
            KlineInterval::OneMinute
        );
        assert_eq!(
            "15M".parse::<KlineInterval>().unwrap(),
            KlineInterval::FifteenMinutes
        );
        assert_eq!(
            "12h".parse::<KlineInterval>().unwrap(),
            KlineInterval::TwelveHours
        );
        assert_eq!("1d".parse::<KlineInterval>().unwrap(), KlineInterval::OneDay);

        assert!("3m".parse::<KlineInterval>().is_err());
        assert!("invalid".parse::<KlineInterval>().is_err());
    }

    #[test]
    fn test_kline_interval_serialization() {
        let json = serde_json::to_string(&KlineInterval::OneHour).unwrap();
        assert_eq!(json, "\"1h\"");

        let interval: KlineInterval = serde_json::from_str("\"4h\"").unwrap();
        assert_eq!(interval, KlineInterval::FourHours);
    }

    #[test]
    fn test_kline_interval_display_matches_parse() {
        for interval in [
            KlineInterval::OneMinute,
            KlineInterval::FiveMinutes,
            KlineInterval::FifteenMinutes,
            KlineInterval::OneHour,
            KlineInterval::FourHours,
            KlineInterval::TwelveHours,
            KlineInterval::OneDay,
        ] {
            assert_eq!(interval.to_string().parse::<KlineInterval>(), Ok(interval));
        }
    }

    #[test]
    fn test_discovery_timeframe() {
        assert_eq!(
            KlineInterval::FifteenMinutes.discovery_timeframe(),
            ("minute", 15)
        );
        assert_eq!(KlineInterval::FourHours.discovery_timeframe(), ("hour", 4));
        assert_eq!(KlineInterval::OneDay.discovery_timeframe(), ("day", 1));
    }

    #[test]
    fn test_kline_params_defaults() {
        let json = r#"{"chain_id":56,"base":"0xa","quote":"0xb","interval":"1h"}"#;
        let params: KlineParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.chain_id, 56);
        assert_eq!(params.limit, None);
        assert_eq!(params.start_time, None);
        assert_eq!(params.end_time, None);
    }

    #[test]
    fn test_candle_serialization() {
        let candle = Candle {
            open_time: 1704067200,
            open: "1.5".to_string(),
            high: "2".to_string(),
            low: "1".to_string(),
            close: "1.75".to_string(),
            volume: "1000".to_string(),
        };

        let json = serde_json::to_string(&candle).unwrap();
        assert!(json.contains("\"open_time\":1704067200"));
        assert!(json.contains("\"close\":\"1.75\""));
    }
}
