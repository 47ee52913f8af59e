//! Static per-chain feed registry.
//!
//! Built once from [`Config`] at start and shared read-only afterwards.
//! Token addresses are keyed lower-case so lookups ignore EVM checksum casing.

use crate::config::Config;
use std::collections::{BTreeMap, HashMap};

/// Mapping of a token to a direct-exchange trading symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectExchangeMapping {
    /// Exchange symbol, e.g. `"BNBUSDT"`.
    pub symbol: String,
}

/// What the registry knows about one token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedDescriptor {
    /// Canonical display symbol.
    pub symbol: String,
    /// Direct-exchange mapping, if the token trades on the direct exchange.
    pub direct_exchange: Option<DirectExchangeMapping>,
}

/// A configured chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    /// EVM chain id.
    pub chain_id: u64,
    /// Human-readable name.
    pub name: String,
    /// Network slug understood by the discovery indexer.
    pub network: String,
}

/// Immutable chain and token feed tables.
#[derive(Debug, Default)]
pub struct FeedRegistry {
    chains: BTreeMap<u64, Chain>,
    feeds: HashMap<(u64, String), FeedDescriptor>,
}

impl FeedRegistry {
    /// Builds the registry from configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let chains = config
            .chains
            .iter()
            .map(|c| {
                (
                    c.chain_id,
                    Chain {
                        chain_id: c.chain_id,
                        name: c.name.clone(),
                        network: c.network.clone(),
                    },
                )
            })
            .collect();

        let feeds = config
            .feeds
            .iter()
            .map(|f| {
                (
                    (f.chain_id, f.address.to_lowercase()),
                    FeedDescriptor {
                        symbol: f.symbol.clone(),
                        direct_exchange: f
                            .exchange_symbol
                            .as_ref()
                            .map(|symbol| DirectExchangeMapping {
                                symbol: symbol.clone(),
                            }),
                    },
                )
            })
            .collect();

        Self { chains, feeds }
    }

    /// Looks up the feed of a token. A miss is a normal routing input.
    #[must_use]
    pub fn lookup(&self, chain_id: u64, token_address: &str) -> Option<&FeedDescriptor> {
        self.feeds.get(&(chain_id, token_address.to_lowercase()))
    }

    /// Returns a configured chain.
    #[must_use]
    pub fn chain(&self, chain_id: u64) -> Option<&Chain> {
        self.chains.get(&chain_id)
    }

    /// Returns all chains ordered by chain id.
    pub fn chains(&self) -> impl Iterator<Item = &Chain> {
        self.chains.values()
    }

    /// Returns the feeds of one chain as `(address, descriptor)`, sorted by symbol.
    #[must_use]
    pub fn feeds_for_chain(&self, chain_id: u64) -> Vec<(&str, &FeedDescriptor)> {
        let mut feeds: Vec<_> = self
            .feeds
            .iter()
            .filter(|((chain, _), _)| *chain == chain_id)
            .map(|((_, address), feed)| (address.as_str(), feed))
            .collect();
        feeds.sort_by(|a, b| a.1.symbol.cmp(&b.1.symbol).then(a.0.cmp(b.0)));
        feeds
    }
}
