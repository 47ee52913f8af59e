//! Source selection for kline requests.

use crate::market::registry::FeedRegistry;
use std::sync::Arc;

/// Upstream chosen to serve one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutingDecision {
    /// Fetch from the direct exchange using the mapped symbol.
    DirectExchange(String),
    /// Discover the token's most liquid venue and fetch from the indexer.
    Discovery,
}

/// Picks the upstream for a pair from the base token's feed alone.
///
/// The quote token is not consulted. Routing is a registry lookup and never
/// performs I/O.
#[derive(Debug, Clone)]
pub struct SourceRouter {
    registry: Arc<FeedRegistry>,
}

impl SourceRouter {
    /// Creates a router over the given registry.
    #[must_use]
    pub fn new(registry: Arc<FeedRegistry>) -> Self {
        Self { registry }
    }

    /// Routes a request for `base_address` on `chain_id`.
    #[must_use]
    pub fn route(&self, chain_id: u64, base_address: &str) -> RoutingDecision {
        match self
            .registry
            .lookup(chain_id, base_address)
            .and_then(|feed| feed.direct_exchange.as_ref())
        {
            Some(mapping) => RoutingDecision::DirectExchange(mapping.symbol.clone()),
            None => RoutingDecision::Discovery,
        }
    }
}
