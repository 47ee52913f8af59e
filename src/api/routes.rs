//! Route configuration.

use crate::api::handlers;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use std::sync::Arc;

/// Creates the API router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Chains & feeds
        .route("/api/v1/chains", get(handlers::list_chains))
        .route("/api/v1/feeds/{chain_id}", get(handlers::list_feeds))
        // Klines
        .route("/api/v1/klines", get(handlers::get_klines))
        .with_state(state)
}
