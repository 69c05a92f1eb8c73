//! Environment-based configuration for API keys and service endpoints.

use std::env;
use thiserror::Error;

pub const ALPHA_VANTAGE_BASE_URL: &str = "https://www.alphavantage.co/query";
pub const NEWSDATA_BASE_URL: &str = "https://newsdata.io/api/1/news";

/// Default number of daily bars fetched for indicator warm-up.
/// Recursive/windowed indicators need history well beyond their nominal
/// period to produce a stable latest value.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 200;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub alpha_vantage_api_key: String,
    pub newsdata_api_key: String,
    pub alpha_vantage_base_url: String,
    pub newsdata_base_url: String,
    /// Base URL of the sentiment inference service (FinBERT behind HTTP).
    pub sentiment_base_url: String,
    pub port: u16,
    pub lookback_days: i64,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// API keys are required; endpoints fall back to the public defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            alpha_vantage_api_key: env::var("ALPHA_VANTAGE_API_KEY")
                .map_err(|_| ConfigError::MissingVar("ALPHA_VANTAGE_API_KEY"))?,
            newsdata_api_key: env::var("NEWSDATA_API_KEY")
                .map_err(|_| ConfigError::MissingVar("NEWSDATA_API_KEY"))?,
            alpha_vantage_base_url: env::var("ALPHA_VANTAGE_BASE_URL")
                .unwrap_or_else(|_| ALPHA_VANTAGE_BASE_URL.to_string()),
            newsdata_base_url: env::var("NEWSDATA_BASE_URL")
                .unwrap_or_else(|_| NEWSDATA_BASE_URL.to_string()),
            sentiment_base_url: env::var("SENTIMENT_SERVICE_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:8000".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            lookback_days: env::var("LOOKBACK_DAYS")
                .ok()
                .and_then(|d| d.parse().ok())
                .unwrap_or(DEFAULT_LOOKBACK_DAYS),
        })
    }
}

/// Current deployment environment ("production", "sandbox", ...).
pub fn get_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "sandbox".to_string())
}
