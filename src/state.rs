//! Application state management.

use crate::config::Config;
use crate::market::{FeedRegistry, KlineService, UpstreamError};
use std::sync::Arc;
use tracing::info;

/// Application state shared across all handlers.
///
/// Everything in here is immutable after start; handlers only read.
#[derive(Clone)]
pub struct AppState {
    /// Chain and token feed registry.
    pub registry: Arc<FeedRegistry>,
    /// Kline routing engine.
    pub klines: Arc<KlineService>,
}

impl AppState {
    /// Creates the application state from configuration.
    ///
    /// # Errors
    /// Returns error if an upstream HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self, UpstreamError> {
        let registry = Arc::new(FeedRegistry::from_config(config));
        let klines = KlineService::from_config(config, Arc::clone(&registry))?;

        info!(
            chains = config.chains.len(),
            feeds = config.feeds.len(),
            direct_endpoints = config.direct_exchange.endpoints.len(),
            "initialized kline engine"
        );

        Ok(Self {
            registry,
            klines: Arc::new(klines),
        })
    }
}
