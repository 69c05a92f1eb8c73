//! Single-indicator strategies.
//!
//! Each strategy maps one indicator evaluation to a decision through a fixed
//! rule. All rules are stateless functions of the latest indicator values;
//! HOLD is the default whenever neither directional threshold is crossed.

use crate::indicators::evaluator;
use crate::models::candle::Candle;
use crate::models::indicators::{IndicatorKind, IndicatorLabel, IndicatorResult};
use crate::models::signal::{Decision, SignalEvidence, TradeSignal};
use crate::signals::error::SignalError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The strategies exposed by the engine.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StrategyKind {
    Rsi,
    Macd,
    #[serde(alias = "SMA")]
    SmaCross,
    Bbands,
}

impl StrategyKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Rsi => "RSI",
            Self::Macd => "MACD",
            Self::SmaCross => "SMA_CROSS",
            Self::Bbands => "BBANDS",
        }
    }

    /// Parse a strategy name from API input.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "RSI" => Some(Self::Rsi),
            "MACD" => Some(Self::Macd),
            "SMA_CROSS" | "SMA" => Some(Self::SmaCross),
            "BBANDS" | "BB" => Some(Self::Bbands),
            _ => None,
        }
    }

    /// Indicator backing this strategy.
    pub fn indicator(self) -> IndicatorKind {
        match self {
            Self::Rsi => IndicatorKind::Rsi,
            Self::Macd => IndicatorKind::Macd,
            Self::SmaCross => IndicatorKind::Sma,
            Self::Bbands => IndicatorKind::Bbands,
        }
    }

    /// Strategy-level default period, where it differs from the indicator's
    /// own default (the SMA cross reads a 50-bar average, not the 20-bar
    /// evaluation default).
    fn default_period(self) -> Option<u32> {
        match self {
            Self::SmaCross => Some(50),
            _ => None,
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Evaluate a single-indicator strategy over a candle series.
///
/// An indicator that cannot be evaluated surfaces here as a hard failure;
/// the compound layer catches it and treats the strategy as abstaining.
pub fn evaluate(
    symbol: &str,
    kind: StrategyKind,
    candles: &[Candle],
    period: Option<u32>,
) -> Result<TradeSignal, SignalError> {
    let mut overrides = BTreeMap::new();
    if let Some(p) = period.or(kind.default_period()) {
        overrides.insert("period".to_string(), p as f64);
    }

    let result = evaluator::evaluate(kind.indicator(), candles, &overrides)?;
    decide(symbol, kind, &result)
}

/// Apply the strategy decision rule to an already-computed indicator result.
pub fn decide(
    symbol: &str,
    kind: StrategyKind,
    result: &IndicatorResult,
) -> Result<TradeSignal, SignalError> {
    let value = |key: &str| {
        result.value(key).ok_or_else(|| {
            SignalError::DataUnavailable(format!(
                "{} evaluation produced no '{}' value",
                result.kind, key
            ))
        })
    };

    let (decision, confidence, rationale) = match kind {
        StrategyKind::Rsi => {
            let rsi = value("rsi")?;
            if rsi < 30.0 {
                (
                    Decision::Buy,
                    ((30.0 - rsi) / 30.0).min(1.0),
                    format!("RSI is oversold at {:.2} (< 30)", rsi),
                )
            } else if rsi > 70.0 {
                (
                    Decision::Sell,
                    ((rsi - 70.0) / 30.0).min(1.0),
                    format!("RSI is overbought at {:.2} (> 70)", rsi),
                )
            } else {
                (
                    Decision::Hold,
                    (rsi - 50.0).abs() / 50.0,
                    format!("RSI is neutral at {:.2}", rsi),
                )
            }
        }
        StrategyKind::Macd => {
            let histogram = value("histogram")?;
            if result.label == IndicatorLabel::Bullish && histogram > 0.0 {
                (
                    Decision::Buy,
                    (histogram.abs() / 10.0).min(1.0),
                    format!("MACD bullish crossover with histogram {:.2}", histogram),
                )
            } else if result.label == IndicatorLabel::Bearish && histogram < 0.0 {
                (
                    Decision::Sell,
                    (histogram.abs() / 10.0).min(1.0),
                    format!("MACD bearish crossover with histogram {:.2}", histogram),
                )
            } else {
                (
                    Decision::Hold,
                    0.3,
                    "MACD shows no clear crossover signal".to_string(),
                )
            }
        }
        StrategyKind::SmaCross => {
            let price = value("price")?;
            let sma = value("sma")?;
            // 2% deadband around the average; confidence scales over a 10%
            // span of relative distance.
            if price > sma * 1.02 {
                (
                    Decision::Buy,
                    ((price - sma) / sma / 0.1).min(1.0),
                    format!("Price ${:.2} is above SMA ${:.2}", price, sma),
                )
            } else if price < sma * 0.98 {
                (
                    Decision::Sell,
                    ((sma - price) / sma / 0.1).min(1.0),
                    format!("Price ${:.2} is below SMA ${:.2}", price, sma),
                )
            } else {
                (
                    Decision::Hold,
                    0.3,
                    format!("Price ${:.2} is near SMA ${:.2}", price, sma),
                )
            }
        }
        StrategyKind::Bbands => {
            let price = value("price")?;
            let upper = value("upper")?;
            let lower = value("lower")?;
            // Confidence scales over a 5% span of relative distance outside
            // the band.
            if price < lower {
                (
                    Decision::Buy,
                    ((lower - price) / lower / 0.05).min(1.0),
                    format!("Price ${:.2} below lower band ${:.2}", price, lower),
                )
            } else if price > upper {
                (
                    Decision::Sell,
                    ((price - upper) / upper / 0.05).min(1.0),
                    format!("Price ${:.2} above upper band ${:.2}", price, upper),
                )
            } else {
                (
                    Decision::Hold,
                    0.3,
                    format!("Price ${:.2} within bands", price),
                )
            }
        }
    };

    Ok(TradeSignal::new(
        symbol,
        kind.name(),
        decision,
        confidence,
        rationale,
        SignalEvidence::Indicator(result.clone()),
    ))
}
