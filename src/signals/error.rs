//! Engine-wide error taxonomy.
//!
//! Indicator-level failures are converted into per-indicator abstentions
//! wherever an aggregator sits above them; they surface as hard failures when
//! nothing can compensate. Top-level entry points never raise past their
//! boundary: the HTTP layer folds every variant into a structured
//! `{error, context}` envelope.

use crate::indicators::error::IndicatorError;
use crate::models::indicators::IndicatorKind;
use crate::services::market_data::MarketDataError;
use crate::services::news::NewsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SignalError {
    #[error("market data unavailable: {0}")]
    DataUnavailable(String),
    #[error("insufficient history: {kind} needs at least {required} candles, got {got}")]
    InsufficientHistory {
        kind: IndicatorKind,
        required: usize,
        got: usize,
    },
    #[error("unknown indicator: {0}")]
    UnknownIndicator(String),
    #[error("unknown strategy: {0}")]
    UnknownStrategy(String),
    #[error("all configured indicators abstained")]
    AllVotesAbstained,
    #[error("invalid weights: {0}")]
    InvalidWeights(String),
    #[error("no news articles available: {0}")]
    NoArticles(String),
}

impl SignalError {
    /// Stable machine-readable tag for the error envelope and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DataUnavailable(_) => "data_unavailable",
            Self::InsufficientHistory { .. } => "insufficient_history",
            Self::UnknownIndicator(_) => "unknown_indicator",
            Self::UnknownStrategy(_) => "unknown_strategy",
            Self::AllVotesAbstained => "all_votes_abstained",
            Self::InvalidWeights(_) => "invalid_weights",
            Self::NoArticles(_) => "no_articles",
        }
    }
}

impl From<IndicatorError> for SignalError {
    fn from(err: IndicatorError) -> Self {
        match err {
            IndicatorError::InsufficientData {
                kind,
                required,
                got,
            } => Self::InsufficientHistory {
                kind,
                required,
                got,
            },
        }
    }
}

impl From<MarketDataError> for SignalError {
    fn from(err: MarketDataError) -> Self {
        Self::DataUnavailable(err.to_string())
    }
}

impl From<NewsError> for SignalError {
    fn from(err: NewsError) -> Self {
        Self::NoArticles(err.to_string())
    }
}
