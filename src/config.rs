//! Configuration module for loading and parsing TOML configuration files.

use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse TOML configuration.
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// Invalid configuration value.
    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Direct-exchange upstream configuration.
    #[serde(default)]
    pub direct_exchange: DirectExchangeConfig,
    /// Discovery indexer configuration.
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    /// Token metadata lookup configuration.
    #[serde(default)]
    pub metadata: MetadataConfig,
    /// Supported chains.
    pub chains: Vec<ChainConfig>,
    /// Static token feed table.
    #[serde(default)]
    pub feeds: Vec<FeedConfig>,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port number to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Direct-exchange candle API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectExchangeConfig {
    /// Candidate base URLs, tried in order.
    pub endpoints: Vec<String>,
    /// Per-endpoint request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl DirectExchangeConfig {
    /// Returns the per-endpoint timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for DirectExchangeConfig {
    fn default() -> Self {
        Self {
            endpoints: vec![
                "https://api.binance.com".to_string(),
                "https://api1.binance.com".to_string(),
                "https://api2.binance.com".to_string(),
            ],
            timeout_ms: 8000,
        }
    }
}

/// Pair-indexing (discovery) API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoveryConfig {
    /// Base URL of the indexer API.
    pub base_url: String,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl DiscoveryConfig {
    /// Returns the per-request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.geckoterminal.com/api/v2".to_string(),
            timeout_ms: 10000,
        }
    }
}

/// Token metadata lookup configuration.
///
/// The lookup shares the discovery indexer's base URL.
#[derive(Debug, Clone, Deserialize)]
pub struct MetadataConfig {
    /// Whether external metadata lookups are performed at all.
    pub enabled: bool,
    /// Lookup timeout in milliseconds.
    pub timeout_ms: u64,
}

impl MetadataConfig {
    /// Returns the lookup timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_ms: 3000,
        }
    }
}

/// Chain configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
    /// EVM chain id.
    pub chain_id: u64,
    /// Human-readable name.
    pub name: String,
    /// Network slug used by the discovery indexer (e.g. "bsc").
    pub network: String,
}

/// Token feed configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Chain the token lives on.
    pub chain_id: u64,
    /// Token contract address.
    pub address: String,
    /// Canonical display symbol.
    pub symbol: String,
    /// Direct-exchange trading symbol (e.g. "BNBUSDT").
    #[serde(default)]
    pub exchange_symbol: Option<String>,
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file.
    ///
    /// # Errors
    /// Returns error if file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Arguments
    /// * `content` - TOML content as string.
    ///
    /// # Errors
    /// Returns error if content cannot be parsed.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration values.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.direct_exchange.endpoints.is_empty() {
            return Err(ConfigError::InvalidValue(
                "at least one direct_exchange endpoint must be configured".to_string(),
            ));
        }
        if self.direct_exchange.timeout_ms == 0
            || self.discovery.timeout_ms == 0
            || self.metadata.timeout_ms == 0
        {
            return Err(ConfigError::InvalidValue(
                "upstream timeouts must be positive".to_string(),
            ));
        }
        if self.chains.is_empty() {
            return Err(ConfigError::InvalidValue(
                "at least one chain must be configured".to_string(),
            ));
        }

        let mut chain_ids = HashSet::new();
        for chain in &self.chains {
            if !chain_ids.insert(chain.chain_id) {
                return Err(ConfigError::InvalidValue(format!(
                    "chain {} is configured twice",
                    chain.chain_id
                )));
            }
            if chain.network.is_empty() {
                return Err(ConfigError::InvalidValue(format!(
                    "chain {} network cannot be empty",
                    chain.chain_id
                )));
            }
        }

        let mut feed_keys = HashSet::new();
        for feed in &self.feeds {
            if !chain_ids.contains(&feed.chain_id) {
                return Err(ConfigError::InvalidValue(format!(
                    "feed {} references unknown chain {}",
                    feed.address, feed.chain_id
                )));
            }
            if feed.symbol.is_empty() {
                return Err(ConfigError::InvalidValue(format!(
                    "feed {} symbol cannot be empty",
                    feed.address
                )));
            }
            if feed.exchange_symbol.as_deref() == Some("") {
                return Err(ConfigError::InvalidValue(format!(
                    "feed {} exchange_symbol cannot be empty",
                    feed.address
                )));
            }
            if !feed_keys.insert((feed.chain_id, feed.address.to_lowercase())) {
                return Err(ConfigError::InvalidValue(format!(
                    "feed {} on chain {} is configured twice",
                    feed.address, feed.chain_id
                )));
            }
        }

        Ok(())
    }
}

fn chain(chain_id: u64, name: &str, network: &str) -> ChainConfig {
    ChainConfig {
        chain_id,
        name: name.to_string(),
        network: network.to_string(),
    }
}

fn feed(chain_id: u64, address: &str, symbol: &str, exchange_symbol: Option<&str>) -> FeedConfig {
    FeedConfig {
        chain_id,
        address: address.to_string(),
        symbol: symbol.to_string(),
        exchange_symbol: exchange_symbol.map(str::to_string),
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            direct_exchange: DirectExchangeConfig::default(),
            discovery: DiscoveryConfig::default(),
            metadata: MetadataConfig::default(),
            chains: vec![
                chain(1, "Ethereum", "eth"),
                chain(56, "BNB Smart Chain", "bsc"),
                chain(8453, "Base", "base"),
                chain(42161, "Arbitrum One", "arbitrum"),
            ],
            feeds: vec![
                // BNB Smart Chain
                feed(56, "0xbb4CdB9CBd36B01bD1cBaEBF2De08d9173bc095c", "BNB", Some("BNBUSDT")),
                feed(56, "0x2170Ed0880ac9A755fd29B2688956BD959F933F8", "ETH", Some("ETHUSDT")),
                feed(56, "0x7130d2A12B9BCbFAe4f2634d864A1Ee1Ce3Ead9c", "BTC", Some("BTCUSDT")),
                feed(56, "0x0E09FaBB73Bd3Ade0a17ECC321fD13a19e81cE82", "CAKE", Some("CAKEUSDT")),
                feed(56, "0x55d398326f99059fF775485246999027B3197955", "USDT", None),
                feed(56, "0x8AC76a51cc950d9822D68b83fE1Ad97B32Cd580d", "USDC", None),
                // Ethereum
                feed(1, "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2", "ETH", Some("ETHUSDT")),
                feed(1, "0x2260FAC5E5542a773Aa44fBCfeDf7C193bc2C599", "BTC", Some("BTCUSDT")),
                feed(1, "0x514910771AF9Ca656af840dff83E8264EcF986CA", "LINK", Some("LINKUSDT")),
                feed(1, "0xdAC17F958D2ee523a2206206994597C13D831ec7", "USDT", None),
                feed(1, "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48", "USDC", None),
                // Base
                feed(8453, "0x4200000000000000000000000000000000000006", "ETH", Some("ETHUSDT")),
                feed(8453, "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913", "USDC", None),
                // Arbitrum One
                feed(42161, "0x82aF49447D8a07e3bd95BD0d56f35241523fBab1", "ETH", Some("ETHUSDT")),
                feed(42161, "0x912CE59144191C1204E64559FE8253a0e49E6548", "ARB", Some("ARBUSDT")),
                feed(42161, "0xaf88d065e77c8cC2239327C5EDb3A432268e5831", "USDC", None),
            ],
        }
    }
}
