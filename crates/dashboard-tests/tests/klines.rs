//! Kline endpoint tests.
//!
//! Requests that reach an upstream depend on live market data, so they accept
//! either candles or a retryable "upstream unavailable" answer.

use dashboard_client::{Error, KlineRequest, KlineResponse};
use dashboard_tests::{BSC_CHAIN_ID, BSC_USDT, BSC_WBNB, create_test_client};

fn assert_valid_candles(response: &KlineResponse, limit: usize) {
    assert!(response.candles.len() <= limit);
    assert!(
        response
            .candles
            .windows(2)
            .all(|w| w[0].open_time < w[1].open_time)
    );
    // Seconds, not milliseconds
    assert!(response.candles.iter().all(|c| c.open_time < 10_000_000_000));
}

#[tokio::test]
async fn test_direct_exchange_klines() {
    let client = create_test_client().expect("Failed to create client");
    let request = KlineRequest::new(BSC_CHAIN_ID, BSC_WBNB, BSC_USDT, "1h").with_limit(200);

    match client.get_klines(&request).await {
        Ok(response) => {
            assert_eq!(response.base_symbol, "BNB");
            assert_eq!(response.quote_symbol, "USDT");
            assert_eq!(response.interval, "1h");
            assert_valid_candles(&response, 200);
        }
        Err(e) => assert!(e.is_retryable(), "unexpected error: {e}"),
    }
}

#[tokio::test]
async fn test_discovery_klines() {
    let client = create_test_client().expect("Failed to create client");
    // USDT has no direct-exchange symbol, so it is served through pool discovery
    let request = KlineRequest::new(BSC_CHAIN_ID, BSC_USDT, BSC_WBNB, "1h").with_limit(50);

    match client.get_klines(&request).await {
        Ok(response) => {
            assert_eq!(response.base_symbol, "USDT");
            assert_valid_candles(&response, 50);
        }
        Err(e) => assert!(
            e.is_retryable() || matches!(e, Error::Api { status: 500, .. }),
            "unexpected error: {e}"
        ),
    }
}

#[tokio::test]
async fn test_same_base_and_quote_rejected() {
    let client = create_test_client().expect("Failed to create client");
    let request = KlineRequest::new(BSC_CHAIN_ID, BSC_WBNB, &BSC_WBNB.to_lowercase(), "1h");

    let result = client.get_klines(&request).await;

    assert!(matches!(result, Err(Error::InvalidRequest(_))));
}

#[tokio::test]
async fn test_unsupported_interval_rejected() {
    let client = create_test_client().expect("Failed to create client");
    let request = KlineRequest::new(BSC_CHAIN_ID, BSC_WBNB, BSC_USDT, "3h");

    let result = client.get_klines(&request).await;

    assert!(matches!(result, Err(Error::InvalidRequest(_))));
}

#[tokio::test]
async fn test_inverted_window_rejected() {
    let client = create_test_client().expect("Failed to create client");
    let request = KlineRequest::new(BSC_CHAIN_ID, BSC_WBNB, BSC_USDT, "1h")
        .with_window(Some(1_704_153_600), Some(1_704_067_200));

    let result = client.get_klines(&request).await;

    assert!(matches!(result, Err(Error::InvalidRequest(_))));
}

#[tokio::test]
async fn test_unknown_chain_rejected() {
    let client = create_test_client().expect("Failed to create client");
    let request = KlineRequest::new(999_999, BSC_WBNB, BSC_USDT, "1h");

    let result = client.get_klines(&request).await;

    assert!(matches!(result, Err(Error::NotFound(_))));
}
