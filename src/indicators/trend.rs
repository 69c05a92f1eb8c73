//! Trend indicators (SMA, EMA, MACD)

use crate::common::math;
use crate::models::candle::Candle;

/// Latest simple moving average of closes.
pub fn calculate_sma(candles: &[Candle], period: usize) -> Option<f64> {
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    math::sma(&closes, period)
}

/// Latest exponential moving average of closes.
pub fn calculate_ema(candles: &[Candle], period: usize) -> Option<f64> {
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    math::ema(&closes, period)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Macd {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// Calculate MACD
///
/// MACD = EMA(fast) - EMA(slow)
/// Signal = EMA(signal_period) of the MACD line
/// Histogram = MACD - Signal
pub fn calculate_macd(
    candles: &[Candle],
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
) -> Option<Macd> {
    if fast_period == 0 || slow_period <= fast_period || signal_period == 0 {
        return None;
    }
    if candles.len() < slow_period + signal_period - 1 {
        return None;
    }

    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let fast_series = math::ema_series(&closes, fast_period)?;
    let slow_series = math::ema_series(&closes, slow_period)?;

    // Both series are aligned to the input at index period-1; the MACD line
    // exists from index slow_period-1 onward.
    let offset = slow_period - fast_period;
    let macd_series: Vec<f64> = slow_series
        .iter()
        .enumerate()
        .map(|(i, slow)| fast_series[i + offset] - slow)
        .collect();

    let signal_series = math::ema_series(&macd_series, signal_period)?;
    let macd = *macd_series.last()?;
    let signal = *signal_series.last()?;

    Some(Macd {
        macd,
        signal,
        histogram: macd - signal,
    })
}

/// Calculate MACD with default periods (12, 26, 9)
pub fn calculate_macd_default(candles: &[Candle]) -> Option<Macd> {
    calculate_macd(candles, 12, 26, 9)
}
