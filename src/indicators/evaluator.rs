//! Indicator evaluation layer.
//!
//! Resolves parameters (explicit override or documented default), invokes the
//! pure computation, and converts the latest value(s) into an
//! [`IndicatorResult`] with a per-indicator labeling rule. Labeling
//! thresholds are fixed per indicator; only periods are configurable.

use crate::indicators::error::IndicatorError;
use crate::indicators::{momentum, trend, volatility};
use crate::models::candle::Candle;
use crate::models::indicators::{IndicatorKind, IndicatorLabel, IndicatorResult};
use std::collections::BTreeMap;

fn param(overrides: &BTreeMap<String, f64>, key: &str, default: f64) -> f64 {
    overrides.get(key).copied().unwrap_or(default)
}

fn period_param(overrides: &BTreeMap<String, f64>, key: &str, default: usize) -> usize {
    overrides
        .get(key)
        .map(|p| p.max(1.0) as usize)
        .unwrap_or(default)
}

/// Resolve the effective parameters for `kind`, applying overrides on top of
/// the documented defaults.
pub fn resolve_params(kind: IndicatorKind, overrides: &BTreeMap<String, f64>) -> BTreeMap<String, f64> {
    let mut params = BTreeMap::new();
    match kind {
        IndicatorKind::Rsi => {
            params.insert("period".into(), period_param(overrides, "period", 14) as f64);
        }
        IndicatorKind::Stoch => {
            params.insert("k".into(), period_param(overrides, "k", 14) as f64);
            params.insert("d".into(), period_param(overrides, "d", 3) as f64);
        }
        IndicatorKind::Cci => {
            params.insert("period".into(), period_param(overrides, "period", 20) as f64);
        }
        IndicatorKind::Willr | IndicatorKind::Atr => {
            params.insert("period".into(), period_param(overrides, "period", 14) as f64);
        }
        IndicatorKind::Roc | IndicatorKind::Mom => {
            params.insert("period".into(), period_param(overrides, "period", 10) as f64);
        }
        IndicatorKind::Sma | IndicatorKind::Ema | IndicatorKind::Donchian => {
            params.insert("period".into(), period_param(overrides, "period", 20) as f64);
        }
        IndicatorKind::Macd => {
            params.insert("fast".into(), period_param(overrides, "fast", 12) as f64);
            params.insert("slow".into(), period_param(overrides, "slow", 26) as f64);
            params.insert("signal".into(), period_param(overrides, "signal", 9) as f64);
        }
        IndicatorKind::Bbands => {
            params.insert("period".into(), period_param(overrides, "period", 20) as f64);
            params.insert("std".into(), param(overrides, "std", 2.0));
        }
    }
    params
}

/// Minimum series length for `kind` under the given resolved parameters.
pub fn min_window(kind: IndicatorKind, params: &BTreeMap<String, f64>) -> usize {
    let period = |key: &str| param(params, key, 1.0) as usize;
    match kind {
        IndicatorKind::Rsi | IndicatorKind::Roc | IndicatorKind::Mom | IndicatorKind::Atr => {
            period("period") + 1
        }
        IndicatorKind::Stoch => period("k") + period("d") - 1,
        IndicatorKind::Cci
        | IndicatorKind::Willr
        | IndicatorKind::Sma
        | IndicatorKind::Ema
        | IndicatorKind::Bbands
        | IndicatorKind::Donchian => period("period"),
        IndicatorKind::Macd => period("slow") + period("signal") - 1,
    }
}

/// Evaluate `kind` over `candles`, reading only the latest bar of the
/// computed series for the output values.
pub fn evaluate(
    kind: IndicatorKind,
    candles: &[Candle],
    overrides: &BTreeMap<String, f64>,
) -> Result<IndicatorResult, IndicatorError> {
    let params = resolve_params(kind, overrides);
    let required = min_window(kind, &params);
    if candles.len() < required {
        return Err(IndicatorError::InsufficientData {
            kind,
            required,
            got: candles.len(),
        });
    }

    let insufficient = || IndicatorError::InsufficientData {
        kind,
        required,
        got: candles.len(),
    };
    // Length was checked above; a None from the computation means the series
    // still could not warm up (e.g. degenerate input).
    let close = candles.last().ok_or_else(insufficient)?.close;
    let period = |key: &str| param(&params, key, 1.0) as usize;

    let mut values = BTreeMap::new();
    let label = match kind {
        IndicatorKind::Rsi => {
            let rsi = momentum::calculate_rsi(candles, period("period")).ok_or_else(insufficient)?;
            values.insert("rsi".into(), rsi);
            if rsi < 30.0 {
                IndicatorLabel::Oversold
            } else if rsi > 70.0 {
                IndicatorLabel::Overbought
            } else {
                IndicatorLabel::Neutral
            }
        }
        IndicatorKind::Stoch => {
            let (k, d) = momentum::calculate_stochastic(candles, period("k"), period("d"))
                .ok_or_else(insufficient)?;
            values.insert("k".into(), k);
            values.insert("d".into(), d);
            if k < 20.0 {
                IndicatorLabel::Oversold
            } else if k > 80.0 {
                IndicatorLabel::Overbought
            } else {
                IndicatorLabel::Neutral
            }
        }
        IndicatorKind::Cci => {
            let cci = momentum::calculate_cci(candles, period("period")).ok_or_else(insufficient)?;
            values.insert("cci".into(), cci);
            if cci < -100.0 {
                IndicatorLabel::Oversold
            } else if cci > 100.0 {
                IndicatorLabel::Overbought
            } else {
                IndicatorLabel::Neutral
            }
        }
        IndicatorKind::Willr => {
            let willr =
                momentum::calculate_williams_r(candles, period("period")).ok_or_else(insufficient)?;
            values.insert("willr".into(), willr);
            if willr < -80.0 {
                IndicatorLabel::Oversold
            } else if willr > -20.0 {
                IndicatorLabel::Overbought
            } else {
                IndicatorLabel::Neutral
            }
        }
        IndicatorKind::Roc => {
            let roc = momentum::calculate_roc(candles, period("period")).ok_or_else(insufficient)?;
            values.insert("roc".into(), roc);
            if roc > 0.0 {
                IndicatorLabel::Bullish
            } else {
                IndicatorLabel::Bearish
            }
        }
        IndicatorKind::Mom => {
            let mom =
                momentum::calculate_momentum(candles, period("period")).ok_or_else(insufficient)?;
            values.insert("mom".into(), mom);
            if mom > 0.0 {
                IndicatorLabel::Bullish
            } else {
                IndicatorLabel::Bearish
            }
        }
        IndicatorKind::Sma => {
            let sma = trend::calculate_sma(candles, period("period")).ok_or_else(insufficient)?;
            values.insert("sma".into(), sma);
            values.insert("price".into(), close);
            if close > sma {
                IndicatorLabel::Bullish
            } else {
                IndicatorLabel::Bearish
            }
        }
        IndicatorKind::Ema => {
            let ema = trend::calculate_ema(candles, period("period")).ok_or_else(insufficient)?;
            values.insert("ema".into(), ema);
            values.insert("price".into(), close);
            if close > ema {
                IndicatorLabel::Bullish
            } else {
                IndicatorLabel::Bearish
            }
        }
        IndicatorKind::Macd => {
            let macd = trend::calculate_macd(candles, period("fast"), period("slow"), period("signal"))
                .ok_or_else(insufficient)?;
            values.insert("macd".into(), macd.macd);
            values.insert("signal".into(), macd.signal);
            values.insert("histogram".into(), macd.histogram);
            if macd.macd > macd.signal {
                IndicatorLabel::Bullish
            } else {
                IndicatorLabel::Bearish
            }
        }
        IndicatorKind::Bbands => {
            let bands =
                volatility::calculate_bollinger(candles, period("period"), param(&params, "std", 2.0))
                    .ok_or_else(insufficient)?;
            values.insert("upper".into(), bands.upper);
            values.insert("middle".into(), bands.middle);
            values.insert("lower".into(), bands.lower);
            values.insert("price".into(), close);
            values.insert("bandwidth".into(), bands.upper - bands.lower);
            if close > bands.upper {
                IndicatorLabel::Overbought
            } else if close < bands.lower {
                IndicatorLabel::Oversold
            } else {
                IndicatorLabel::Neutral
            }
        }
        IndicatorKind::Donchian => {
            let bands = volatility::calculate_donchian(candles, period("period"))
                .ok_or_else(insufficient)?;
            values.insert("upper".into(), bands.upper);
            values.insert("middle".into(), bands.middle);
            values.insert("lower".into(), bands.lower);
            values.insert("price".into(), close);
            if close >= bands.upper {
                IndicatorLabel::BreakoutUp
            } else if close <= bands.lower {
                IndicatorLabel::BreakoutDown
            } else {
                IndicatorLabel::Neutral
            }
        }
        IndicatorKind::Atr => {
            let series = volatility::calculate_atr_series(candles, period("period"))
                .ok_or_else(insufficient)?;
            let atr = *series.last().ok_or_else(insufficient)?;
            let mean_atr = series.iter().sum::<f64>() / series.len() as f64;
            values.insert("atr".into(), atr);
            values.insert("mean_atr".into(), mean_atr);
            if atr > mean_atr {
                IndicatorLabel::HighVolatility
            } else {
                IndicatorLabel::LowVolatility
            }
        }
    };

    Ok(IndicatorResult {
        kind,
        params,
        values,
        label,
    })
}
