//! Unit tests for volatility indicators

use chrono::Utc;
use sentrix::indicators::volatility::*;
use sentrix::models::candle::Candle;

fn candles_from_closes(closes: &[f64]) -> Vec<Candle> {
    closes
        .iter()
        .map(|&c| Candle::new(c, c + 1.0, c - 1.0, c, 1000.0, Utc::now()))
        .collect()
}

#[test]
fn bollinger_bands_are_symmetric_around_middle() {
    let closes: Vec<f64> = (0..40).map(|i| 100.0 + ((i % 5) as f64 - 2.0)).collect();
    let bands = calculate_bollinger(&candles_from_closes(&closes), 20, 2.0).unwrap();
    assert!(bands.upper > bands.middle);
    assert!(bands.lower < bands.middle);
    let upper_gap = bands.upper - bands.middle;
    let lower_gap = bands.middle - bands.lower;
    assert!((upper_gap - lower_gap).abs() < 1e-9);
}

#[test]
fn bollinger_bands_collapse_on_constant_series() {
    let bands = calculate_bollinger(&candles_from_closes(&vec![50.0; 30]), 20, 2.0).unwrap();
    assert_eq!(bands.upper, bands.middle);
    assert_eq!(bands.lower, bands.middle);
}

#[test]
fn bollinger_insufficient_data() {
    let closes = vec![1.0; 19];
    assert!(calculate_bollinger(&candles_from_closes(&closes), 20, 2.0).is_none());
}

#[test]
fn donchian_channel_spans_window_extrema() {
    let closes: Vec<f64> = (0..30).map(|i| 100.0 + (i % 10) as f64).collect();
    let candles = candles_from_closes(&closes);
    let bands = calculate_donchian(&candles, 20).unwrap();
    assert_eq!(bands.upper, 110.0); // highest high = 109 + 1
    assert_eq!(bands.lower, 99.0); // lowest low = 100 - 1
    assert_eq!(bands.middle, 104.5);
}

#[test]
fn atr_positive_and_tracks_range() {
    let closes: Vec<f64> = (0..40).map(|i| 100.0 + i as f64 * 0.1).collect();
    let atr = calculate_atr(&candles_from_closes(&closes), 14).unwrap();
    // Bar range is 2.0 with small gaps between closes.
    assert!(atr >= 2.0);
    assert!(atr < 3.0);
}

#[test]
fn atr_series_alignment() {
    let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64 * 0.1).collect();
    let series = calculate_atr_series(&candles_from_closes(&closes), 14).unwrap();
    // 29 true ranges, smoothed over 14 -> 16 values.
    assert_eq!(series.len(), 16);
}

#[test]
fn atr_insufficient_data() {
    let closes = vec![100.0; 14];
    assert!(calculate_atr(&candles_from_closes(&closes), 14).is_none());
}
