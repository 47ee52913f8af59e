//! HTTP client library for the Grid Dashboard API.
//!
//! This crate provides a typed HTTP client for the dashboard backend's REST
//! surface: health, configured chains and feeds, and routed kline data.
//!
//! # Example
//!
//! ```no_run
//! use dashboard_client::{ClientConfig, DashboardClient, KlineRequest};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), dashboard_client::Error> {
//!     let client = DashboardClient::new(ClientConfig {
//!         base_url: "http://localhost:8080".into(),
//!         timeout: Duration::from_secs(30),
//!     })?;
//!
//!     let klines = client
//!         .get_klines(&KlineRequest::new(
//!             56,
//!             "0xbb4CdB9CBd36B01bD1cBaEBF2De08d9173bc095c",
//!             "0x55d398326f99059fF775485246999027B3197955",
//!             "1h",
//!         ))
//!         .await?;
//!     println!("{} candles for {}", klines.candles.len(), klines.base_symbol);
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::{ClientConfig, DashboardClient};
pub use error::Error;
pub use types::*;
