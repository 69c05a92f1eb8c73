//! Momentum oscillators (RSI, stochastic, CCI, Williams %R, ROC, MOM)

use crate::common::math;
use crate::models::candle::Candle;

/// Calculate RSI over the last `period` price changes.
///
/// RSI = 100 - (100 / (1 + RS))
/// RS = Average Gain / Average Loss
pub fn calculate_rsi(candles: &[Candle], period: usize) -> Option<f64> {
    if period == 0 || candles.len() < period + 1 {
        return None;
    }

    let mut gains = Vec::with_capacity(candles.len() - 1);
    let mut losses = Vec::with_capacity(candles.len() - 1);
    for pair in candles.windows(2) {
        let change = pair[1].close - pair[0].close;
        if change > 0.0 {
            gains.push(change);
            losses.push(0.0);
        } else {
            gains.push(0.0);
            losses.push(change.abs());
        }
    }

    let avg_gain = gains.iter().rev().take(period).sum::<f64>() / period as f64;
    let avg_loss = losses.iter().rev().take(period).sum::<f64>() / period as f64;

    if avg_loss == 0.0 {
        return Some(100.0);
    }

    let rs = avg_gain / avg_loss;
    Some(100.0 - (100.0 / (1.0 + rs)))
}

/// Stochastic oscillator: latest %K and its `d_period` SMA (%D).
///
/// %K = 100 * (close - lowest low) / (highest high - lowest low)
pub fn calculate_stochastic(
    candles: &[Candle],
    k_period: usize,
    d_period: usize,
) -> Option<(f64, f64)> {
    if k_period == 0 || d_period == 0 || candles.len() < k_period + d_period - 1 {
        return None;
    }

    let mut k_series = Vec::with_capacity(d_period);
    for offset in (0..d_period).rev() {
        let end = candles.len() - offset;
        let window = &candles[end - k_period..end];
        let highest = math::highest(&window.iter().map(|c| c.high).collect::<Vec<_>>(), k_period)?;
        let lowest = math::lowest(&window.iter().map(|c| c.low).collect::<Vec<_>>(), k_period)?;
        let close = window.last()?.close;
        let range = highest - lowest;
        let k = if range == 0.0 {
            50.0
        } else {
            100.0 * (close - lowest) / range
        };
        k_series.push(k);
    }

    let k = *k_series.last()?;
    let d = math::mean(&k_series)?;
    Some((k, d))
}

/// Commodity Channel Index over typical prices.
///
/// CCI = (TP - SMA(TP)) / (0.015 * mean deviation)
pub fn calculate_cci(candles: &[Candle], period: usize) -> Option<f64> {
    if period == 0 || candles.len() < period {
        return None;
    }

    let typical: Vec<f64> = candles
        .iter()
        .map(|c| (c.high + c.low + c.close) / 3.0)
        .collect();
    let window = &typical[typical.len() - period..];
    let avg = math::mean(window)?;
    let mean_dev = window.iter().map(|tp| (tp - avg).abs()).sum::<f64>() / period as f64;
    if mean_dev == 0.0 {
        return Some(0.0);
    }
    Some((typical.last()? - avg) / (0.015 * mean_dev))
}

/// Williams %R, range [-100, 0].
pub fn calculate_williams_r(candles: &[Candle], period: usize) -> Option<f64> {
    if period == 0 || candles.len() < period {
        return None;
    }
    let window = &candles[candles.len() - period..];
    let highest = math::highest(&window.iter().map(|c| c.high).collect::<Vec<_>>(), period)?;
    let lowest = math::lowest(&window.iter().map(|c| c.low).collect::<Vec<_>>(), period)?;
    let close = window.last()?.close;
    let range = highest - lowest;
    if range == 0.0 {
        return Some(-50.0);
    }
    Some(-100.0 * (highest - close) / range)
}

/// Rate of change, percent versus the close `period` bars ago.
pub fn calculate_roc(candles: &[Candle], period: usize) -> Option<f64> {
    if period == 0 || candles.len() < period + 1 {
        return None;
    }
    let current = candles.last()?.close;
    let past = candles[candles.len() - 1 - period].close;
    if past == 0.0 {
        return None;
    }
    Some(100.0 * (current - past) / past)
}

/// Raw momentum: close minus the close `period` bars ago.
pub fn calculate_momentum(candles: &[Candle], period: usize) -> Option<f64> {
    if period == 0 || candles.len() < period + 1 {
        return None;
    }
    Some(candles.last()?.close - candles[candles.len() - 1 - period].close)
}
