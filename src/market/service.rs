//! Kline request orchestration.
//!
//! ```text
//! KlineQuery ─► SourceRouter ─┬─► DirectExchangeFetcher ─┐
//!                             └─► DiscoveryFetcher ──────┼─► normalized candles
//!             SymbolResolver (base) ─────────────────────┤
//!             SymbolResolver (quote) ────────────────────┘─► KlineResult
//! ```
//!
//! The candle fetch and both symbol resolutions run concurrently within the
//! request. Dropping the returned future aborts any pending upstream call.

use crate::config::Config;
use crate::market::direct::DirectExchangeFetcher;
use crate::market::discovery::DiscoveryFetcher;
use crate::market::error::{KlineError, UpstreamError};
use crate::market::metadata::IndexerTokenMetadata;
use crate::market::normalize::apply_window;
use crate::market::registry::FeedRegistry;
use crate::market::router::{RoutingDecision, SourceRouter};
use crate::market::symbol::{SymbolResolver, TokenMetadata};
use crate::models::{Candle, KlineQuery, KlineResult};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};


/// Serves kline requests by routing them to the right upstream.
#[derive(Clone)]
pub struct KlineService {
    router: SourceRouter,
    resolver: SymbolResolver,
    direct: DirectExchangeFetcher,
    discovery: DiscoveryFetcher,
}

impl KlineService {
    /// Assembles a service from its collaborators.
    #[must_use]
    pub fn new(
        registry: Arc<FeedRegistry>,
        direct: DirectExchangeFetcher,
        discovery: DiscoveryFetcher,
        metadata: Option<Arc<dyn TokenMetadata>>,
        metadata_timeout: Duration,
    ) -> Self {
        Self {
            router: SourceRouter::new(Arc::clone(&registry)),
            resolver: SymbolResolver::new(registry, metadata, metadata_timeout),
            direct,
            discovery,
        }
    }

    /// Builds the service and its HTTP clients from configuration.
    ///
    /// # Errors
    /// Returns error if an HTTP client cannot be built.
    pub fn from_config(config: &Config, registry: Arc<FeedRegistry>) -> Result<Self, UpstreamError> {
        let direct = DirectExchangeFetcher::new(&config.direct_exchange)?;
        let discovery = DiscoveryFetcher::new(&config.discovery, Arc::clone(&registry))?;

        let metadata: Option<Arc<dyn TokenMetadata>> = if config.metadata.enabled {
            Some(Arc::new(IndexerTokenMetadata::new(
                &config.discovery,
                &config.metadata,
                Arc::clone(&registry),
            )?))
        } else {
            None
        };

        Ok(Self::new(
            registry,
            direct,
            discovery,
            metadata,
            config.metadata.timeout(),
        ))
    }

    /// Fetches normalized candles and display symbols for a token pair.
    ///
    /// # Errors
    /// Returns [`KlineError::Timeout`] when the upstream timed out or every
    /// direct-exchange endpoint failed, [`KlineError::Upstream`] otherwise.
    pub async fn get_klines(&self, query: &KlineQuery) -> Result<KlineResult, KlineError> {
        let decision = self.router.route(query.chain_id, &query.base_address);
        debug!(
            chain_id = query.chain_id,
            base = %query.base_address,
            interval = %query.interval,
            limit = query.limit,
            route = ?decision,
            "routing kline request"
        );

        let (candles, base_symbol, quote_symbol) = tokio::join!(
            self.fetch_candles(&decision, query),
            self.resolver
                .resolve_symbol(query.chain_id, &query.base_address),
            self.resolver
                .resolve_symbol(query.chain_id, &query.quote_address),
        );

        let candles = candles.map_err(|e| {
            let err = KlineError::from(e);
            warn!(
                chain_id = query.chain_id,
                base = %query.base_address,
                route = ?decision,
                kind = ?err.kind(),
                error = %err,
                "kline request failed"
            );
            err
        })?;

        Ok(KlineResult {
            base_address: query.base_address.clone(),
            quote_address: query.quote_address.clone(),
            chain_id: query.chain_id,
            base_symbol,
            quote_symbol,
            interval: query.interval,
            candles,
        })
    }

    async fn fetch_candles(
        &self,
        decision: &RoutingDecision,
        query: &KlineQuery,
    ) -> Result<Vec<Candle>, UpstreamError> {
        match decision {
            RoutingDecision::DirectExchange(symbol) => {
                let candles = self
                    .direct
                    .fetch(
                        symbol,
                        query.interval,
                        query.limit,
                        query.start_time.map(|s| s.saturating_mul(1000)),
                        query.end_time.map(|s| s.saturating_mul(1000)),
                    )
                    .await?;
                Ok(apply_window(
                    candles,
                    query.start_time,
                    query.end_time,
                    query.limit as usize,
                ))
            }
            RoutingDecision::Discovery => {
                self.discovery
                    .fetch(
                        query.chain_id,
                        &query.base_address,
                        query.interval,
                        query.limit,
                        query.start_time,
                        query.end_time,
                    )
                    .await
            }
        }
    }
}
