//! Market data provider interface.

use crate::models::candle::{Candle, Quote};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("symbol not found: {0}")]
    NotFound(String),
    #[error("rate limited by provider: {0}")]
    RateLimited(String),
    #[error("connection error: {0}")]
    Connection(String),
    #[error("malformed provider response: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    Daily,
    Weekly,
    Monthly,
}

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetch an ordered (oldest-first) OHLCV series for `symbol` between
    /// `start` and `end`. Callers requesting indicator input should ask for
    /// enough warm-up history; recursive indicators need lookback well beyond
    /// their nominal window (200 daily bars by default).
    async fn fetch_price_series(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        interval: Interval,
    ) -> Result<Vec<Candle>, MarketDataError>;

    /// Fetch the latest quote for `symbol`.
    async fn fetch_current_quote(&self, symbol: &str) -> Result<Quote, MarketDataError>;
}
