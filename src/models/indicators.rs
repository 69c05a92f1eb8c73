//! Indicator evaluation records.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Every indicator the evaluation layer can compute.
///
/// New indicators are added as variants; there is no string dispatch inside
/// the engine. Strings survive only at the API boundary, where
/// [`IndicatorKind::parse`] rejects unknown names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IndicatorKind {
    Rsi,
    Stoch,
    Cci,
    Willr,
    Roc,
    Mom,
    Sma,
    Ema,
    Macd,
    Bbands,
    Donchian,
    Atr,
}

impl IndicatorKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Rsi => "RSI",
            Self::Stoch => "STOCH",
            Self::Cci => "CCI",
            Self::Willr => "WILLR",
            Self::Roc => "ROC",
            Self::Mom => "MOM",
            Self::Sma => "SMA",
            Self::Ema => "EMA",
            Self::Macd => "MACD",
            Self::Bbands => "BBANDS",
            Self::Donchian => "DONCHIAN",
            Self::Atr => "ATR",
        }
    }

    /// Parse an indicator name from API input. Case-insensitive, with the
    /// aliases the upstream providers commonly use.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "RSI" => Some(Self::Rsi),
            "STOCH" | "STOCHASTIC" => Some(Self::Stoch),
            "CCI" => Some(Self::Cci),
            "WILLR" => Some(Self::Willr),
            "ROC" => Some(Self::Roc),
            "MOM" | "MOMENTUM" => Some(Self::Mom),
            "SMA" => Some(Self::Sma),
            "EMA" => Some(Self::Ema),
            "MACD" => Some(Self::Macd),
            "BBANDS" | "BB" => Some(Self::Bbands),
            "DONCHIAN" | "DC" => Some(Self::Donchian),
            "ATR" => Some(Self::Atr),
            _ => None,
        }
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Signal-label vocabulary across indicators. Each indicator uses its own
/// subset (oscillators label oversold/overbought, averages bullish/bearish,
/// channels breakouts).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IndicatorLabel {
    Oversold,
    Overbought,
    Neutral,
    Bullish,
    Bearish,
    BreakoutUp,
    BreakoutDown,
    HighVolatility,
    LowVolatility,
}

/// Normalized output of one indicator evaluation: the resolved parameters,
/// the latest computed value(s) and the label derived from them.
///
/// Immutable once produced; recomputed fresh on every call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorResult {
    pub kind: IndicatorKind,
    pub params: BTreeMap<String, f64>,
    pub values: BTreeMap<String, f64>,
    pub label: IndicatorLabel,
}

impl IndicatorResult {
    /// Convenience accessor for a named value.
    pub fn value(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }
}
