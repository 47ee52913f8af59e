//! Grid Dashboard Backend Server
//!
//! REST API server exposing chain feeds and routed kline data.

use grid_dashboard_backend::api::create_router;
use grid_dashboard_backend::config::Config;
use grid_dashboard_backend::state::AppState;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use grid_dashboard_backend::models::{
    Candle, ChainSummary, ChainsListResponse, FeedSummary, FeedsListResponse, HealthResponse,
    KlineInterval, KlineResult,
};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    paths(
        grid_dashboard_backend::api::handlers::health_check,
        grid_dashboard_backend::api::handlers::list_chains,
        grid_dashboard_backend::api::handlers::list_feeds,
        grid_dashboard_backend::api::handlers::get_klines,
    ),
    components(
        schemas(
            HealthResponse,
            ChainSummary,
            ChainsListResponse,
            FeedSummary,
            FeedsListResponse,
            KlineInterval,
            Candle,
            KlineResult,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Feeds", description = "Configured chains and token feeds"),
        (name = "Klines", description = "Candlestick data routed across upstreams"),
    ),
    info(
        title = "Grid Dashboard API",
        version = "0.1.0",
        description = "REST API serving DeFi token candlestick data",
        license(name = "MIT")
    )
)]
struct ApiDoc;

/// Loads the configuration file, falling back to built-in defaults when it is absent.
fn load_config() -> anyhow::Result<Config> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    if Path::new(&path).exists() {
        info!("Loading configuration from {}", path);
        Ok(Config::load(&path)?)
    } else {
        warn!("Configuration file {} not found, using defaults", path);
        Ok(Config::default())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = load_config()?;

    // Environment overrides the [server] section
    let host = std::env::var("HOST").unwrap_or_else(|_| config.server.host.clone());
    let port: u16 = match std::env::var("PORT") {
        Ok(port) => port.parse()?,
        Err(_) => config.server.port,
    };

    // Create application state
    let state = Arc::new(AppState::from_config(&config)?);

    info!("Starting Grid Dashboard Backend on {}:{}", host, port);
    info!(
        "Swagger UI available at http://{}:{}/swagger-ui/",
        host, port
    );

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the router
    let app = create_router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Start the server
    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
