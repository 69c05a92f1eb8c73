//! Shared data models spanning the engine layers.

pub mod candle;
pub mod indicators;
pub mod sentiment;
pub mod signal;

pub use candle::{Candle, Quote};
pub use indicators::{IndicatorKind, IndicatorLabel, IndicatorResult};
pub use sentiment::{
    ArticleSentiment, SentimentDistribution, SentimentLabel, SentimentScores, SentimentSummary,
};
pub use signal::{Decision, SignalEvidence, TradeSignal, WeightedSignal};
