//! Direct-exchange candle client with endpoint failover.

use crate::config::DirectExchangeConfig;
use crate::market::error::{UpstreamError, truncate_body};
use crate::market::normalize::{RowLayout, normalize_rows};
use crate::models::{Candle, KlineInterval};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

const UPSTREAM: &str = "direct exchange";

/// Fetches interval candles from a Binance-compatible API.
///
/// Candidate endpoints are tried strictly in configured order. A network
/// error, timeout or non-success status moves on to the next candidate;
/// the first success is returned immediately and no endpoint is retried.
#[derive(Debug, Clone)]
pub struct DirectExchangeFetcher {
    client: Client,
    endpoints: Vec<String>,
    timeout: Duration,
}

impl DirectExchangeFetcher {
    /// Creates a fetcher from configuration.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: &DirectExchangeConfig) -> Result<Self, UpstreamError> {
        let timeout = config.timeout();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(UpstreamError::Transport)?;

        Ok(Self {
            client,
            endpoints: config
                .endpoints
                .iter()
                .map(|e| e.trim_end_matches('/').to_string())
                .collect(),
            timeout,
        })
    }

    /// Fetches candles for `symbol`, failing over across endpoints.
    ///
    /// # Errors
    /// Returns [`UpstreamError::AllEndpointsFailed`] when every endpoint fails,
    /// or [`UpstreamError::Decode`] when an endpoint answers with a payload
    /// that is not a candle array.
    pub async fn fetch(
        &self,
        symbol: &str,
        interval: KlineInterval,
        limit: u32,
        start_time_ms: Option<u64>,
        end_time_ms: Option<u64>,
    ) -> Result<Vec<Candle>, UpstreamError> {
        if self.endpoints.is_empty() {
            return Err(UpstreamError::NoEndpoints);
        }

        let mut failures = Vec::with_capacity(self.endpoints.len());
        for endpoint in &self.endpoints {
            match self
                .fetch_from(endpoint, symbol, interval, limit, start_time_ms, end_time_ms)
                .await
            {
                Ok(rows) => {
                    debug!(
                        endpoint = %endpoint,
                        symbol,
                        rows = rows.len(),
                        "direct-exchange klines fetched"
                    );
                    return normalize_rows(&rows, RowLayout::DIRECT_EXCHANGE);
                }
                Err(e @ UpstreamError::Decode(_)) => return Err(e),
                Err(e) => {
                    warn!(
                        endpoint = %endpoint,
                        symbol,
                        error = %e,
                        "direct-exchange endpoint failed, trying next"
                    );
                    failures.push(format!("{}: {}", endpoint, e));
                }
            }
        }

        Err(UpstreamError::AllEndpointsFailed { failures })
    }

    async fn fetch_from(
        &self,
        endpoint: &str,
        symbol: &str,
        interval: KlineInterval,
        limit: u32,
        start_time_ms: Option<u64>,
        end_time_ms: Option<u64>,
    ) -> Result<Vec<Vec<Value>>, UpstreamError> {
        let url = format!("{}/api/v3/klines", endpoint);
        let mut params = vec![
            ("symbol", symbol.to_string()),
            ("interval", interval.as_str().to_string()),
            ("limit", limit.to_string()),
        ];
        if let Some(start) = start_time_ms {
            params.push(("startTime", start.to_string()));
        }
        if let Some(end) = end_time_ms {
            params.push(("endTime", end.to_string()));
        }

        let resp = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| UpstreamError::from_transport(e, UPSTREAM, self.timeout))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body: truncate_body(body),
            });
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| UpstreamError::from_transport(e, UPSTREAM, self.timeout))?;
        serde_json::from_slice(&bytes).map_err(|e| {
            UpstreamError::Decode(format!("expected kline array from {}: {}", endpoint, e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::error::{FailureKind, classify};
    use crate::market::testing::{
        BASE_OPEN_TIME_MS, failing_exchange, fake_exchange, malformed_exchange, slow_exchange,
        unreachable_endpoint,
    };
    use axum::http::StatusCode;

    fn fetcher(endpoints: Vec<String>, timeout_ms: u64) -> DirectExchangeFetcher {
        DirectExchangeFetcher::new(&DirectExchangeConfig {
            endpoints,
            timeout_ms,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_from_first_endpoint() {
        let primary = fake_exchange().await;
        let secondary = fake_exchange().await;
        let fetcher = fetcher(vec![primary.url.clone(), secondary.url.clone()], 2000);

        let candles = fetcher
            .fetch("BNBUSDT", KlineInterval::OneHour, 200, None, None)
            .await
            .unwrap();

        assert_eq!(candles.len(), 200);
        assert_eq!(candles[0].open_time, BASE_OPEN_TIME_MS / 1000);
        assert_eq!(candles[1].open_time - candles[0].open_time, 3600);
        assert_eq!(candles[0].open, "612.1");
        assert_eq!(candles[0].volume, "1520.75");
        assert_eq!(primary.hits(), 1);
        assert_eq!(secondary.hits(), 0);
    }

    #[tokio::test]
    async fn test_start_time_is_forwarded_in_milliseconds() {
        let exchange = fake_exchange().await;
        let fetcher = fetcher(vec![exchange.url.clone()], 2000);
        let start_ms = BASE_OPEN_TIME_MS + 86_400_000;

        let candles = fetcher
            .fetch("BNBUSDT", KlineInterval::OneDay, 3, Some(start_ms), None)
            .await
            .unwrap();

        assert_eq!(candles.len(), 3);
        assert_eq!(candles[0].open_time, start_ms / 1000);
    }

    #[tokio::test]
    async fn test_failover_skips_unreachable_and_failing_endpoints() {
        let down = unreachable_endpoint().await;
        let broken = failing_exchange(StatusCode::BAD_GATEWAY).await;
        let healthy = fake_exchange().await;
        let fetcher = fetcher(vec![down, broken.url.clone(), healthy.url.clone()], 2000);

        let candles = fetcher
            .fetch("BNBUSDT", KlineInterval::FiveMinutes, 10, None, None)
            .await
            .unwrap();

        assert_eq!(candles.len(), 10);
        assert_eq!(broken.hits(), 1);
        assert_eq!(healthy.hits(), 1);
    }

    #[tokio::test]
    async fn test_client_error_status_also_fails_over() {
        let exchange = fake_exchange().await;
        let fetcher = fetcher(vec![exchange.url.clone(), exchange.url.clone()], 2000);

        let err = fetcher
            .fetch("BADUSDT", KlineInterval::OneHour, 10, None, None)
            .await
            .unwrap_err();

        assert_eq!(exchange.hits(), 2);
        match &err {
            UpstreamError::AllEndpointsFailed { failures } => {
                assert_eq!(failures.len(), 2);
                assert!(failures[0].contains("HTTP 400"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_all_endpoints_failing_is_classified_timeout() {
        let fetcher = fetcher(
            vec![
                unreachable_endpoint().await,
                unreachable_endpoint().await,
                unreachable_endpoint().await,
            ],
            2000,
        );

        let err = fetcher
            .fetch("BNBUSDT", KlineInterval::OneHour, 200, None, None)
            .await
            .unwrap_err();

        assert!(matches!(&err, UpstreamError::AllEndpointsFailed { failures } if failures.len() == 3));
        assert!(err.to_string().starts_with("all 3 endpoints failed"));
        assert_eq!(classify(&err), FailureKind::Timeout);
    }

    #[tokio::test]
    async fn test_slow_endpoint_times_out_and_advances() {
        let slow = slow_exchange(Duration::from_secs(5)).await;
        let healthy = fake_exchange().await;
        let fetcher = fetcher(vec![slow.url.clone(), healthy.url.clone()], 200);

        let candles = fetcher
            .fetch("BNBUSDT", KlineInterval::OneMinute, 5, None, None)
            .await
            .unwrap();

        assert_eq!(candles.len(), 5);
        assert_eq!(slow.hits(), 1);
        assert_eq!(healthy.hits(), 1);
    }

    #[tokio::test]
    async fn test_single_slow_endpoint_reports_timeout() {
        let slow = slow_exchange(Duration::from_secs(5)).await;
        let fetcher = fetcher(vec![slow.url.clone()], 200);

        let err = fetcher
            .fetch("BNBUSDT", KlineInterval::OneMinute, 5, None, None)
            .await
            .unwrap_err();

        match &err {
            UpstreamError::AllEndpointsFailed { failures } => {
                assert!(failures[0].contains("timeout"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(classify(&err), FailureKind::Timeout);
    }

    #[tokio::test]
    async fn test_malformed_payload_is_not_failed_over() {
        let malformed = malformed_exchange().await;
        let healthy = fake_exchange().await;
        let fetcher = fetcher(vec![malformed.url.clone(), healthy.url.clone()], 2000);

        let err = fetcher
            .fetch("BNBUSDT", KlineInterval::OneHour, 5, None, None)
            .await
            .unwrap_err();

        assert!(matches!(err, UpstreamError::Decode(_)));
        assert_eq!(classify(&err), FailureKind::Other);
        assert_eq!(healthy.hits(), 0);
    }

    #[tokio::test]
    async fn test_no_endpoints() {
        let fetcher = fetcher(vec![], 2000);
        let err = fetcher
            .fetch("BNBUSDT", KlineInterval::OneHour, 5, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, UpstreamError::NoEndpoints));
    }
}
