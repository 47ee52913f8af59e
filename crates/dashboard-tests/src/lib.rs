//! Integration tests for the Grid Dashboard API.
//!
//! These tests require the API server to be running. Configure the server URL
//! via the `API_BASE_URL` environment variable (default: `http://localhost:8080`).

use dashboard_client::{ClientConfig, DashboardClient};
use std::time::Duration;

/// BNB Smart Chain id.
pub const BSC_CHAIN_ID: u64 = 56;

/// Wrapped BNB on BNB Smart Chain, mapped to a direct-exchange symbol by default.
pub const BSC_WBNB: &str = "0xbb4CdB9CBd36B01bD1cBaEBF2De08d9173bc095c";

/// Tether USD on BNB Smart Chain.
pub const BSC_USDT: &str = "0x55d398326f99059fF775485246999027B3197955";

/// Gets the API base URL from environment or uses default.
#[must_use]
pub fn get_api_url() -> String {
    std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string())
}

/// Creates a test client configured for the API.
///
/// # Errors
/// Returns error if client creation fails.
pub fn create_test_client() -> Result<DashboardClient, dashboard_client::Error> {
    DashboardClient::new(ClientConfig {
        base_url: get_api_url(),
        timeout: Duration::from_secs(30),
    })
}
