//! # Grid Dashboard Backend - Kline Routing Server
//!
//! A REST API backend that serves candlestick (kline) data for arbitrary
//! EVM token pairs. Built with [Axum](https://crates.io/crates/axum) for async
//! HTTP handling and provides OpenAPI/Swagger documentation via
//! [utoipa](https://crates.io/crates/utoipa).
//!
//! ## Key Features
//!
//! - **Source Routing**: Tokens with a configured centralized-exchange symbol
//!   are served from that exchange; every other token is served from its most
//!   liquid on-chain pool through a pair indexer.
//!
//! - **Endpoint Failover**: Direct-exchange requests walk a prioritized list of
//!   regional mirrors and return the first success.
//!
//! - **Uniform Candles**: Both upstreams are normalized to ascending candles with
//!   second timestamps and decimal-string prices.
//!
//! - **Failure Classification**: Upstream timeouts surface as a retryable
//!   `503 UPSTREAM_TIMEOUT`; other failures as a generic server error.
//!
//! - **Structured Logging**: Request tracing with `tower-http` and `tracing`.
//!
//! ## Architecture
//!
//! ```text
//! GET /api/v1/klines
//!   └── KlineService
//!         ├── SourceRouter ──┬── DirectExchangeFetcher   (exchange symbol)
//!         │                  └── DiscoveryFetcher        (pool discovery)
//!         ├── SymbolResolver (base)  registry → metadata → address prefix
//!         └── SymbolResolver (quote)
//! ```
//!
//! ## Module Structure
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`api`] | Route handlers and router configuration |
//! | [`config`] | TOML configuration |
//! | [`error`] | API error types with `IntoResponse` implementation |
//! | [`market`] | Kline routing engine |
//! | [`models`] | Request/response DTOs with OpenAPI schemas |
//! | [`state`] | Application state management |
//!
//! ## API Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/api/v1/chains` | List configured chains |
//! | GET | `/api/v1/feeds/{chain_id}` | List token feeds of a chain |
//! | GET | `/api/v1/klines` | Candlestick data for a token pair |
//!
//! ## Example Usage
//!
//! ```bash
//! # Development mode with built-in defaults
//! cargo run
//!
//! # Custom configuration file and port
//! CONFIG_PATH=config.toml PORT=3000 cargo run
//!
//! # BNB/USDT hourly candles on BNB Smart Chain
//! curl "http://localhost:8080/api/v1/klines?chain_id=56&base=0xbb4CdB9CBd36B01bD1cBaEBF2De08d9173bc095c&quote=0x55d398326f99059fF775485246999027B3197955&interval=1h&limit=200"
//! ```
//!
//! ## Swagger UI
//!
//! ```text
//! http://localhost:8080/swagger-ui/
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod market;
pub mod models;
pub mod state;
