//! Kline market-data routing engine.
//!
//! A request for candles of a token pair is routed to one of two upstreams:
//! a centralized exchange when the base token has a configured trading symbol,
//! or a pair indexer that first discovers the token's most liquid pool.
//! Candles from either path come back in one normalized shape, and failures
//! are classified as retryable timeouts or generic upstream errors.
//!
//! | Module | Role |
//! |--------|------|
//! | [`registry`] | Static chain and token feed lookup |
//! | [`router`] | Picks the upstream for a request |
//! | [`symbol`] | Best-effort display symbol resolution |
//! | [`metadata`] | Indexer-backed token metadata lookup |
//! | [`direct`] | Direct-exchange client with endpoint failover |
//! | [`discovery`] | Pool discovery and OHLCV client |
//! | [`normalize`] | Candle normalization and windowing |
//! | [`error`] | Upstream errors and their classification |
//! | [`service`] | Request orchestration |

pub mod direct;
pub mod discovery;
pub mod error;
pub mod metadata;
pub mod normalize;
pub mod registry;
pub mod router;
pub mod service;
pub mod symbol;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{FailureKind, KlineError, UpstreamError, classify};
pub use registry::FeedRegistry;
pub use router::{RoutingDecision, SourceRouter};
pub use service::KlineService;
pub use symbol::{SymbolResolver, TokenMetadata};
