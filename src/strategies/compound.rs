//! Compound technical strategy: a weighted vote across single-indicator
//! strategies.
//!
//! Strategies whose indicator cannot be evaluated abstain rather than fail
//! the whole vote. Scores are normalized by the weight of the strategies that
//! actually voted, so abstentions do not silently deflate the result near
//! the decision threshold.

use crate::models::candle::Candle;
use crate::models::signal::{Decision, SignalEvidence, TradeSignal, WeightedSignal};
use crate::signals::error::SignalError;
use crate::strategies::single::{self, StrategyKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

pub const STRATEGY_ID: &str = "COMPOUND_TECHNICAL";

/// Score a normalized vote must exceed to produce a directional decision.
const DECISION_THRESHOLD: f64 = 0.3;

/// Weight and optional period override for one member strategy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IndicatorWeight {
    pub weight: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<u32>,
}

impl IndicatorWeight {
    pub fn new(weight: f64) -> Self {
        Self {
            weight,
            period: None,
        }
    }

    pub fn with_period(weight: f64, period: u32) -> Self {
        Self {
            weight,
            period: Some(period),
        }
    }
}

/// Member strategies with their weights. Weights need not sum to one;
/// relative magnitude is what matters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompoundConfig {
    pub indicators: BTreeMap<StrategyKind, IndicatorWeight>,
}

impl Default for CompoundConfig {
    fn default() -> Self {
        let mut indicators = BTreeMap::new();
        indicators.insert(StrategyKind::Rsi, IndicatorWeight::with_period(0.3, 14));
        indicators.insert(StrategyKind::Macd, IndicatorWeight::new(0.3));
        indicators.insert(StrategyKind::SmaCross, IndicatorWeight::with_period(0.2, 50));
        indicators.insert(StrategyKind::Bbands, IndicatorWeight::with_period(0.2, 20));
        Self { indicators }
    }
}

/// Evaluate every configured strategy and aggregate the votes.
pub fn evaluate(
    symbol: &str,
    config: &CompoundConfig,
    candles: &[Candle],
) -> Result<TradeSignal, SignalError> {
    let mut votes = Vec::with_capacity(config.indicators.len());

    for (&kind, member) in &config.indicators {
        match single::evaluate(symbol, kind, candles, member.period) {
            Ok(signal) => votes.push(WeightedSignal::new(signal, member.weight)),
            Err(err) => {
                warn!(
                    symbol = %symbol,
                    strategy = %kind,
                    error = %err,
                    "compound member abstained"
                );
            }
        }
    }

    aggregate(symbol, votes)
}

/// Aggregate weighted votes into one signal.
///
/// `buy_score` is the weight-scaled confidence of BUY votes divided by the
/// participating weight (all votes, HOLD included; abstainers excluded),
/// `sell_score` symmetric. BUY requires `buy_score > sell_score` and
/// `buy_score > 0.3`; otherwise HOLD with confidence shrinking as the two
/// scores diverge.
pub fn aggregate(symbol: &str, votes: Vec<WeightedSignal>) -> Result<TradeSignal, SignalError> {
    let participating_weight: f64 = votes.iter().map(|v| v.weight).sum();
    if votes.is_empty() || participating_weight <= 0.0 {
        return Err(SignalError::AllVotesAbstained);
    }

    // Renormalize against the participating weight so the stored evidence
    // carries weights in [0, 1] no matter the configured scale.
    let votes: Vec<WeightedSignal> = votes
        .into_iter()
        .map(|v| {
            let weight = v.weight / participating_weight;
            WeightedSignal::new(v.signal, weight)
        })
        .collect();

    let mut buy_score = 0.0;
    let mut sell_score = 0.0;
    for vote in &votes {
        match vote.signal.decision {
            Decision::Buy => buy_score += vote.signal.confidence * vote.weight,
            Decision::Sell => sell_score += vote.signal.confidence * vote.weight,
            Decision::Hold => {}
        }
    }

    let (decision, confidence) = if buy_score > sell_score && buy_score > DECISION_THRESHOLD {
        (Decision::Buy, buy_score)
    } else if sell_score > buy_score && sell_score > DECISION_THRESHOLD {
        (Decision::Sell, sell_score)
    } else {
        (Decision::Hold, 1.0 - (buy_score - sell_score).abs())
    };

    let buy_names: Vec<&str> = votes
        .iter()
        .filter(|v| v.signal.decision == Decision::Buy)
        .map(|v| v.signal.strategy.as_str())
        .collect();
    let sell_names: Vec<&str> = votes
        .iter()
        .filter(|v| v.signal.decision == Decision::Sell)
        .map(|v| v.signal.strategy.as_str())
        .collect();

    let rationale = format!(
        "Buy signals: {}. Sell signals: {}. Weighted buy score {:.3}, sell score {:.3}.",
        if buy_names.is_empty() {
            "None".to_string()
        } else {
            buy_names.join(", ")
        },
        if sell_names.is_empty() {
            "None".to_string()
        } else {
            sell_names.join(", ")
        },
        buy_score,
        sell_score,
    );

    Ok(TradeSignal::new(
        symbol,
        STRATEGY_ID,
        decision,
        confidence,
        rationale,
        SignalEvidence::Votes(votes),
    ))
}
