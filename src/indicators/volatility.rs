//! Volatility indicators (Bollinger Bands, ATR, Donchian channels)

use crate::common::math;
use crate::models::candle::Candle;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// Calculate Bollinger Bands
///
/// Middle Band = SMA(period)
/// Upper Band = Middle + (std_mult * standard deviation)
/// Lower Band = Middle - (std_mult * standard deviation)
pub fn calculate_bollinger(candles: &[Candle], period: usize, std_mult: f64) -> Option<Bands> {
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let middle = math::sma(&closes, period)?;
    let std = math::stddev(&closes, period)?;

    Some(Bands {
        upper: middle + std_mult * std,
        middle,
        lower: middle - std_mult * std,
    })
}

/// Donchian channel over the last `period` bars: rolling extrema of
/// high/low and their midpoint.
pub fn calculate_donchian(candles: &[Candle], period: usize) -> Option<Bands> {
    if period == 0 || candles.len() < period {
        return None;
    }
    let highs: Vec<f64> = candles.iter().map(|c| c.high).collect();
    let lows: Vec<f64> = candles.iter().map(|c| c.low).collect();
    let upper = math::highest(&highs, period)?;
    let lower = math::lowest(&lows, period)?;

    Some(Bands {
        upper,
        middle: (upper + lower) / 2.0,
        lower,
    })
}

/// Average True Range series, SMA-smoothed.
///
/// True range needs the previous close, so the series is aligned to the
/// input starting at index `period`.
pub fn calculate_atr_series(candles: &[Candle], period: usize) -> Option<Vec<f64>> {
    if period == 0 || candles.len() < period + 1 {
        return None;
    }

    let true_ranges: Vec<f64> = candles
        .windows(2)
        .map(|pair| {
            let (prev, current) = (&pair[0], &pair[1]);
            (current.high - current.low)
                .max((current.high - prev.close).abs())
                .max((current.low - prev.close).abs())
        })
        .collect();

    let mut series = Vec::with_capacity(true_ranges.len() - period + 1);
    for end in period..=true_ranges.len() {
        series.push(math::mean(&true_ranges[end - period..end])?);
    }
    Some(series)
}

/// Latest ATR value.
pub fn calculate_atr(candles: &[Candle], period: usize) -> Option<f64> {
    calculate_atr_series(candles, period).and_then(|s| s.last().copied())
}
