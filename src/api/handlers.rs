//! API request handlers.

use crate::error::ApiError;
use crate::market::FeedRegistry;
use crate::market::normalize::MILLIS_THRESHOLD;
use crate::models::{
    ChainSummary, ChainsListResponse, DEFAULT_KLINE_LIMIT, FeedSummary, FeedsListResponse,
    HealthResponse, KlineInterval, KlineParams, KlineQuery, KlineResult, MAX_KLINE_LIMIT,
};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, Query, State};
use std::sync::Arc;

/// Validates raw kline query parameters into an engine query.
fn build_kline_query(params: KlineParams, registry: &FeedRegistry) -> Result<KlineQuery, ApiError> {
    if registry.chain(params.chain_id).is_none() {
        return Err(ApiError::ChainNotFound(params.chain_id));
    }

    let interval: KlineInterval = params
        .interval
        .parse()
        .map_err(|e: String| ApiError::InvalidRequest(e))?;

    let base = params.base.trim();
    let quote = params.quote.trim();
    if base.is_empty() || quote.is_empty() {
        return Err(ApiError::InvalidRequest(
            "base and quote token addresses are required".to_string(),
        ));
    }
    if base.eq_ignore_ascii_case(quote) {
        return Err(ApiError::InvalidRequest(
            "base and quote tokens must differ".to_string(),
        ));
    }

    if let (Some(start), Some(end)) = (params.start_time, params.end_time)
        && start > end
    {
        return Err(ApiError::InvalidRequest(format!(
            "start_time {} is after end_time {}",
            start, end
        )));
    }

    for timestamp in [params.start_time, params.end_time].into_iter().flatten() {
        if timestamp >= MILLIS_THRESHOLD {
            return Err(ApiError::InvalidRequest(format!(
                "timestamp {} is out of range, expected unix seconds",
                timestamp
            )));
        }
    }

    let limit = params.limit.unwrap_or(DEFAULT_KLINE_LIMIT);
    if limit == 0 {
        return Err(ApiError::InvalidRequest(
            "limit must be at least 1".to_string(),
        ));
    }

    Ok(KlineQuery {
        chain_id: params.chain_id,
        base_address: base.to_string(),
        quote_address: quote.to_string(),
        interval,
        limit: limit.min(MAX_KLINE_LIMIT),
        start_time: params.start_time,
        end_time: params.end_time,
    })
}

// ============================================================================
// Health Check
// ============================================================================

/// Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "Health"
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============================================================================
// Chains & Feeds
// ============================================================================

/// List configured chains.
#[utoipa::path(
    get,
    path = "/api/v1/chains",
    responses(
        (status = 200, description = "Configured chains", body = ChainsListResponse)
    ),
    tag = "Feeds"
)]
pub async fn list_chains(State(state): State<Arc<AppState>>) -> Json<ChainsListResponse> {
    let chains = state
        .registry
        .chains()
        .map(|chain| ChainSummary {
            chain_id: chain.chain_id,
            name: chain.name.clone(),
            network: chain.network.clone(),
        })
        .collect();

    Json(ChainsListResponse { chains })
}

/// List the token feeds registered for a chain.
#[utoipa::path(
    get,
    path = "/api/v1/feeds/{chain_id}",
    params(
        ("chain_id" = u64, Path, description = "EVM chain id")
    ),
    responses(
        (status = 200, description = "Feed registry entries", body = FeedsListResponse),
        (status = 404, description = "Chain not found")
    ),
    tag = "Feeds"
)]
pub async fn list_feeds(
    State(state): State<Arc<AppState>>,
    Path(chain_id): Path<u64>,
) -> Result<Json<FeedsListResponse>, ApiError> {
    if state.registry.chain(chain_id).is_none() {
        return Err(ApiError::ChainNotFound(chain_id));
    }

    let feeds = state
        .registry
        .feeds_for_chain(chain_id)
        .into_iter()
        .map(|(address, feed)| FeedSummary {
            address: address.to_string(),
            symbol: feed.symbol.clone(),
            exchange_symbol: feed.direct_exchange.as_ref().map(|m| m.symbol.clone()),
        })
        .collect();

    Ok(Json(FeedsListResponse { chain_id, feeds }))
}

// ============================================================================
// Klines
// ============================================================================

/// Get candlestick data for a token pair.
///
/// Tokens with a direct-exchange symbol are served from the exchange; all
/// others are served from their most liquid on-chain pool. A 503 means the
/// upstream timed out and the request can be retried.
#[utoipa::path(
    get,
    path = "/api/v1/klines",
    params(
        ("chain_id" = u64, Query, description = "EVM chain id"),
        ("base" = String, Query, description = "Base token address"),
        ("quote" = String, Query, description = "Quote token address"),
        ("interval" = String, Query, description = "Candle interval: 1m, 5m, 15m, 1h, 4h, 12h, 1d"),
        ("limit" = Option<u32>, Query, description = "Maximum number of candles (default 500, max 1000)"),
        ("start_time" = Option<u64>, Query, description = "Start timestamp in seconds (optional)"),
        ("end_time" = Option<u64>, Query, description = "End timestamp in seconds (optional)")
    ),
    responses(
        (status = 200, description = "Candlestick data", body = KlineResult),
        (status = 400, description = "Invalid parameters"),
        (status = 404, description = "Chain not found"),
        (status = 503, description = "Upstream timed out or unavailable")
    ),
    tag = "Klines"
)]
pub async fn get_klines(
    State(state): State<Arc<AppState>>,
    Query(params): Query<KlineParams>,
) -> Result<Json<KlineResult>, ApiError> {
    let query = build_kline_query(params, &state.registry)?;
    let result = state.klines.get_klines(&query).await?;
    Ok(Json(result))
}
