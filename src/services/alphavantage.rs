//! Alpha Vantage market data client.
//!
//! Retries transient connection failures itself; rate limiting and unknown
//! symbols surface as typed errors for the engine to handle.

use crate::models::candle::{Candle, Quote};
use crate::services::market_data::{Interval, MarketDataError, MarketDataProvider};
use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

pub struct AlphaVantageClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct DailyBar {
    #[serde(rename = "1. open")]
    open: String,
    #[serde(rename = "2. high")]
    high: String,
    #[serde(rename = "3. low")]
    low: String,
    #[serde(rename = "4. close")]
    close: String,
    #[serde(rename = "5. volume")]
    volume: String,
}

#[derive(Debug, Deserialize)]
struct GlobalQuote {
    #[serde(rename = "01. symbol")]
    symbol: String,
    #[serde(rename = "05. price")]
    price: String,
    #[serde(rename = "07. latest trading day")]
    latest_trading_day: String,
}

impl AlphaVantageClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_client(base_url, api_key, reqwest::Client::new())
    }

    /// Construct with an externally built client, so tests can point at a
    /// mock server.
    pub fn with_client(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    async fn request(&self, params: &[(&str, &str)]) -> Result<Value, MarketDataError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(params)
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| MarketDataError::Connection(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(MarketDataError::RateLimited(status.to_string()));
        }
        if !status.is_success() {
            return Err(MarketDataError::Connection(format!(
                "unexpected status {}",
                status
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| MarketDataError::Malformed(e.to_string()))?;

        // Alpha Vantage reports throttling and bad symbols inside a 200 body.
        if let Some(note) = payload
            .get("Note")
            .or_else(|| payload.get("Information"))
            .and_then(Value::as_str)
        {
            return Err(MarketDataError::RateLimited(note.to_string()));
        }
        if let Some(message) = payload.get("Error Message").and_then(Value::as_str) {
            return Err(MarketDataError::NotFound(message.to_string()));
        }

        Ok(payload)
    }

    /// Issue a request, retrying transient connection failures.
    async fn request_with_retry(&self, params: &[(&str, &str)]) -> Result<Value, MarketDataError> {
        (|| self.request(params))
            .retry(ExponentialBuilder::default().with_max_times(2))
            .when(|err| matches!(err, MarketDataError::Connection(_)))
            .await
    }

    fn parse_date(date: &str) -> Result<DateTime<Utc>, MarketDataError> {
        let day = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|e| MarketDataError::Malformed(format!("bad date '{}': {}", date, e)))?;
        day.and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc())
            .ok_or_else(|| MarketDataError::Malformed(format!("bad date '{}'", date)))
    }

    fn parse_value(field: &str, value: &str) -> Result<f64, MarketDataError> {
        value
            .parse::<f64>()
            .map_err(|_| MarketDataError::Malformed(format!("bad {} '{}'", field, value)))
    }
}

fn series_keys(interval: Interval) -> (&'static str, &'static str) {
    match interval {
        Interval::Daily => ("TIME_SERIES_DAILY", "Time Series (Daily)"),
        Interval::Weekly => ("TIME_SERIES_WEEKLY", "Weekly Time Series"),
        Interval::Monthly => ("TIME_SERIES_MONTHLY", "Monthly Time Series"),
    }
}

#[async_trait]
impl MarketDataProvider for AlphaVantageClient {
    async fn fetch_price_series(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        interval: Interval,
    ) -> Result<Vec<Candle>, MarketDataError> {
        let (function, series_key) = series_keys(interval);
        let payload = self
            .request_with_retry(&[
                ("function", function),
                ("symbol", symbol),
                ("outputsize", "full"),
            ])
            .await?;

        let series = payload
            .get(series_key)
            .ok_or_else(|| MarketDataError::Malformed(format!("missing '{}'", series_key)))?;
        // BTreeMap keys are ISO dates, so iteration is already oldest-first.
        let bars: BTreeMap<String, DailyBar> = serde_json::from_value(series.clone())
            .map_err(|e| MarketDataError::Malformed(e.to_string()))?;

        let mut candles = Vec::with_capacity(bars.len());
        for (date, bar) in &bars {
            let timestamp = Self::parse_date(date)?;
            if timestamp < start || timestamp > end {
                continue;
            }
            candles.push(Candle::new(
                Self::parse_value("open", &bar.open)?,
                Self::parse_value("high", &bar.high)?,
                Self::parse_value("low", &bar.low)?,
                Self::parse_value("close", &bar.close)?,
                Self::parse_value("volume", &bar.volume)?,
                timestamp,
            ));
        }

        debug!(symbol = %symbol, count = candles.len(), "fetched price series");
        Ok(candles)
    }

    async fn fetch_current_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        let payload = self
            .request_with_retry(&[("function", "GLOBAL_QUOTE"), ("symbol", symbol)])
            .await?;

        let quote = payload
            .get("Global Quote")
            .ok_or_else(|| MarketDataError::Malformed("missing 'Global Quote'".to_string()))?;
        let quote: GlobalQuote = serde_json::from_value(quote.clone())
            .map_err(|e| MarketDataError::Malformed(e.to_string()))?;

        Ok(Quote {
            symbol: quote.symbol,
            price: Self::parse_value("price", &quote.price)?,
            timestamp: Self::parse_date(&quote.latest_trading_day)?,
        })
    }
}
