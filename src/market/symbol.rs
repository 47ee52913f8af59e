//! Best-effort token symbol resolution.
//!
//! Symbols are UI labels only. Resolution walks an ordered chain of sources
//! and the first non-empty answer wins; no source can fail the request.

use crate::market::error::UpstreamError;
use crate::market::registry::FeedRegistry;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Number of address characters used by the last-resort label.
pub const ADDRESS_PREFIX_LEN: usize = 10;

/// Label returned when even the address is empty.
const UNKNOWN_SYMBOL: &str = "UNKNOWN";

/// External token metadata lookup.
#[async_trait]
pub trait TokenMetadata: Send + Sync {
    /// Returns the token's symbol, or `None` when the token is unknown.
    async fn token_symbol(
        &self,
        chain_id: u64,
        address: &str,
    ) -> Result<Option<String>, UpstreamError>;
}

/// A single step of the resolution chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolSource {
    /// Static feed registry.
    Registry,
    /// External metadata lookup.
    Metadata,
    /// Leading characters of the address.
    AddressPrefix,
}

/// Order in which sources are tried.
pub const RESOLUTION_ORDER: [SymbolSource; 3] = [
    SymbolSource::Registry,
    SymbolSource::Metadata,
    SymbolSource::AddressPrefix,
];

/// Resolves token addresses to display symbols.
#[derive(Clone)]
pub struct SymbolResolver {
    registry: Arc<FeedRegistry>,
    metadata: Option<Arc<dyn TokenMetadata>>,
    metadata_timeout: Duration,
}

impl SymbolResolver {
    /// Creates a resolver. Without a metadata collaborator the chain skips
    /// straight from the registry to the address prefix.
    #[must_use]
    pub fn new(
        registry: Arc<FeedRegistry>,
        metadata: Option<Arc<dyn TokenMetadata>>,
        metadata_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            metadata,
            metadata_timeout,
        }
    }

    /// Resolves a display symbol. Never fails and never returns an empty string.
    pub async fn resolve_symbol(&self, chain_id: u64, token_address: &str) -> String {
        for source in RESOLUTION_ORDER {
            if let Some(symbol) = self.try_source(source, chain_id, token_address).await
                && !symbol.is_empty()
            {
                return symbol;
            }
        }
        UNKNOWN_SYMBOL.to_string()
    }

    async fn try_source(
        &self,
        source: SymbolSource,
        chain_id: u64,
        token_address: &str,
    ) -> Option<String> {
        match source {
            SymbolSource::Registry => self
                .registry
                .lookup(chain_id, token_address)
                .map(|feed| feed.symbol.clone()),
            SymbolSource::Metadata => self.lookup_metadata(chain_id, token_address).await,
            SymbolSource::AddressPrefix => {
                debug!(chain_id, token_address, "falling back to address prefix symbol");
                Some(token_address.chars().take(ADDRESS_PREFIX_LEN).collect())
            }
        }
    }

    async fn lookup_metadata(&self, chain_id: u64, token_address: &str) -> Option<String> {
        let metadata = self.metadata.as_ref()?;
        let lookup = metadata.token_symbol(chain_id, token_address);

        match tokio::time::timeout(self.metadata_timeout, lookup).await {
            Ok(Ok(symbol)) => symbol.map(|s| s.trim().to_string()),
            Ok(Err(e)) => {
                debug!(chain_id, token_address, error = %e, "token metadata lookup failed");
                None
            }
            Err(_) => {
                debug!(chain_id, token_address, "token metadata lookup timed out");
                None
            }
        }
    }
}
