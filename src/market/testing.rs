//! In-process fake upstreams for engine tests.
//!
//! Each fake is an axum router bound to an ephemeral localhost port.

use crate::models::KlineInterval;
use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::net::TcpListener;

/// Open time of the first generated candle, in milliseconds.
pub(crate) const BASE_OPEN_TIME_MS: u64 = 1_704_067_200_000;

/// A running fake upstream.
pub(crate) struct Upstream {
    pub url: String,
    pub hits: Arc<AtomicUsize>,
}

impl Upstream {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Returns the URL of a port nothing listens on.
pub(crate) async fn unreachable_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

fn exchange_rows(params: &HashMap<String, String>) -> Vec<Value> {
    let limit: u64 = params
        .get("limit")
        .and_then(|l| l.parse().ok())
        .unwrap_or(500);
    let step_ms = params
        .get("interval")
        .and_then(|i| i.parse::<KlineInterval>().ok())
        .map_or(60, |i| i.seconds())
        * 1000;
    let start_ms = params
        .get("startTime")
        .and_then(|s| s.parse().ok())
        .unwrap_or(BASE_OPEN_TIME_MS);

    (0..limit)
        .map_while(|i| {
            let open_ms = start_ms.checked_add(i * step_ms)?;
            let close_ms = open_ms.checked_add(step_ms - 1)?;
            Some(json!([
                open_ms,
                "612.10000000",
                "615.00000000",
                "610.50000000",
                "613.25000000",
                "1520.75000000",
                close_ms,
                "932456.12",
                321,
                "760.1",
                "465901.3",
                "0"
            ]))
        })
        .collect()
}

/// Binance-style `/api/v3/klines` serving any symbol except `BADUSDT`.
pub(crate) async fn fake_exchange() -> Upstream {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let router = Router::new().route(
        "/api/v3/klines",
        get(move |Query(params): Query<HashMap<String, String>>| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                if params.get("symbol").map(String::as_str) == Some("BADUSDT") {
                    return (
                        StatusCode::BAD_REQUEST,
                        Json(json!({"code": -1121, "msg": "Invalid symbol."})),
                    )
                        .into_response();
                }
                Json(Value::Array(exchange_rows(&params))).into_response()
            }
        }),
    );
    Upstream {
        url: serve(router).await,
        hits,
    }
}

/// An exchange that always answers with `status`.
pub(crate) async fn failing_exchange(status: StatusCode) -> Upstream {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let router = Router::new().route(
        "/api/v3/klines",
        get(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                (status, "upstream failure")
            }
        }),
    );
    Upstream {
        url: serve(router).await,
        hits,
    }
}

/// An exchange that answers only after `delay`.
pub(crate) async fn slow_exchange(delay: Duration) -> Upstream {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let router = Router::new().route(
        "/api/v3/klines",
        get(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(delay).await;
                Json(json!([]))
            }
        }),
    );
    Upstream {
        url: serve(router).await,
        hits,
    }
}

/// An exchange that answers 200 with a body that is not a candle array.
pub(crate) async fn malformed_exchange() -> Upstream {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let router = Router::new().route(
        "/api/v3/klines",
        get(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Json(json!({"unexpected": true}))
            }
        }),
    );
    Upstream {
        url: serve(router).await,
        hits,
    }
}

/// Behaviour of the fake pair indexer.
#[derive(Debug, Clone)]
pub(crate) struct IndexerFixture {
    /// Most liquid pool returned by discovery; `None` means no venue.
    pub pool: Option<&'static str>,
    /// Symbol returned by the token endpoint; `None` answers 404.
    pub token_symbol: Option<&'static str>,
    /// Candles returned per OHLCV call, regardless of the requested limit.
    pub candle_count: u64,
    /// Delay before answering OHLCV calls.
    pub ohlcv_delay: Option<Duration>,
}

impl Default for IndexerFixture {
    fn default() -> Self {
        Self {
            pool: Some("0x58f876857a02d6762e0101bb5c46a8c1ed44dc16"),
            token_symbol: Some("MEME"),
            candle_count: 300,
            ohlcv_delay: None,
        }
    }
}

fn timeframe_seconds(timeframe: &str, aggregate: u64) -> u64 {
    let unit = match timeframe {
        "minute" => 60,
        "hour" => 3600,
        _ => 86400,
    };
    unit * aggregate
}

/// GeckoTerminal-style indexer with token, pool discovery and OHLCV routes.
pub(crate) async fn fake_indexer(fixture: IndexerFixture) -> String {
    let token_fixture = fixture.clone();
    let pools_fixture = fixture.clone();
    let ohlcv_fixture = fixture;

    let router = Router::new()
        .route(
            "/networks/{network}/tokens/{address}",
            get(move |Path((_network, address)): Path<(String, String)>| {
                let fixture = token_fixture.clone();
                async move {
                    match fixture.token_symbol {
                        Some(symbol) => Json(json!({
                            "data": {
                                "id": address,
                                "type": "token",
                                "attributes": {"address": address, "symbol": symbol, "decimals": 18}
                            }
                        }))
                        .into_response(),
                        None => (
                            StatusCode::NOT_FOUND,
                            Json(json!({"errors": [{"status": "404", "title": "Not Found"}]})),
                        )
                            .into_response(),
                    }
                }
            }),
        )
        .route(
            "/networks/{network}/tokens/{address}/pools",
            get(move |Path((network, _address)): Path<(String, String)>| {
                let fixture = pools_fixture.clone();
                async move {
                    let data: Vec<Value> = fixture
                        .pool
                        .into_iter()
                        .map(|pool| {
                            json!({
                                "id": format!("{network}_{pool}"),
                                "type": "pool",
                                "attributes": {"address": pool, "name": "MEME / WBNB"}
                            })
                        })
                        .collect();
                    Json(json!({ "data": data }))
                }
            }),
        )
        .route(
            "/networks/{network}/pools/{pool}/ohlcv/{timeframe}",
            get(
                move |Path((_network, _pool, timeframe)): Path<(String, String, String)>,
                      Query(params): Query<HashMap<String, String>>| {
                    let fixture = ohlcv_fixture.clone();
                    async move {
                        if let Some(delay) = fixture.ohlcv_delay {
                            tokio::time::sleep(delay).await;
                        }
                        let aggregate = params
                            .get("aggregate")
                            .and_then(|a| a.parse().ok())
                            .unwrap_or(1);
                        let step = timeframe_seconds(&timeframe, aggregate);
                        let before = params
                            .get("before_timestamp")
                            .and_then(|b| b.parse::<u64>().ok())
                            .unwrap_or(BASE_OPEN_TIME_MS / 1000 + fixture.candle_count * step);
                        // Newest first, as the indexer returns them
                        let list: Vec<Value> = (1..=fixture.candle_count)
                            .map(|i| {
                                json!([before.saturating_sub(i * step), 0.00123, 0.00131, 0.00119, 0.00127, 15234.5])
                            })
                            .collect();
                        Json(json!({
                            "data": {"id": "ohlcv", "type": "ohlcv_request_response", "attributes": {"ohlcv_list": list}},
                            "meta": {"base": {"symbol": "MEME"}, "quote": {"symbol": "USD"}}
                        }))
                    }
                },
            ),
        );

    serve(router).await
}

/// An indexer that answers every route with `status` and an HTML error page.
pub(crate) async fn failing_indexer(status: StatusCode, page_bytes: usize) -> String {
    let page = format!("<html><body>{}</body></html>", "x".repeat(page_bytes));
    let router = Router::new().fallback(move || {
        let page = page.clone();
        async move { (status, page) }
    });
    serve(router).await
}
