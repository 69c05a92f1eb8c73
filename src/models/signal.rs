//! Trading signal records.

use crate::models::indicators::IndicatorResult;
use crate::models::sentiment::SentimentSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Decision {
    Buy,
    Sell,
    Hold,
}

impl Decision {
    /// Directional sign used by the weighted aggregations: BUY +1, SELL -1,
    /// HOLD 0.
    pub fn sign(self) -> f64 {
        match self {
            Self::Buy => 1.0,
            Self::Sell => -1.0,
            Self::Hold => 0.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
            Self::Hold => "HOLD",
        }
    }
}

/// The raw numbers a decision was derived from, so a caller can always trace
/// a recommendation back to its inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum SignalEvidence {
    Indicator(IndicatorResult),
    Sentiment(SentimentSummary),
    Votes(Vec<WeightedSignal>),
}

/// One confidence-scored recommendation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeSignal {
    pub symbol: String,
    pub strategy: String,
    pub decision: Decision,
    pub confidence: f64,
    pub rationale: String,
    pub evidence: SignalEvidence,
    pub timestamp: DateTime<Utc>,
}

impl TradeSignal {
    /// Build a signal, clamping confidence into [0, 1].
    pub fn new(
        symbol: impl Into<String>,
        strategy: impl Into<String>,
        decision: Decision,
        confidence: f64,
        rationale: impl Into<String>,
        evidence: SignalEvidence,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            strategy: strategy.into(),
            decision,
            confidence: confidence.clamp(0.0, 1.0),
            rationale: rationale.into(),
            evidence,
            timestamp: Utc::now(),
        }
    }
}

/// A member signal inside a weighted aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightedSignal {
    pub signal: TradeSignal,
    pub weight: f64,
    /// `sign(decision) * confidence * weight`
    pub weighted_score: f64,
}

impl WeightedSignal {
    pub fn new(signal: TradeSignal, weight: f64) -> Self {
        let weighted_score = signal.decision.sign() * signal.confidence * weight;
        Self {
            signal,
            weight,
            weighted_score,
        }
    }
}
