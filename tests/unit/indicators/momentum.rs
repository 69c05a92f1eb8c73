//! Unit tests for momentum oscillators

use chrono::Utc;
use sentrix::indicators::momentum::*;
use sentrix::models::candle::Candle;

fn candles_from_closes(closes: &[f64]) -> Vec<Candle> {
    closes
        .iter()
        .map(|&c| Candle::new(c, c + 0.5, c - 0.5, c, 1000.0, Utc::now()))
        .collect()
}

fn declining_candles(count: usize) -> Vec<Candle> {
    let closes: Vec<f64> = (0..count).map(|i| 100.0 - i as f64).collect();
    candles_from_closes(&closes)
}

fn rising_candles(count: usize) -> Vec<Candle> {
    let closes: Vec<f64> = (0..count).map(|i| 100.0 + i as f64).collect();
    candles_from_closes(&closes)
}

#[test]
fn rsi_is_zero_on_monotonic_decline() {
    let rsi = calculate_rsi(&declining_candles(30), 14).unwrap();
    assert_eq!(rsi, 0.0);
}

#[test]
fn rsi_is_hundred_on_monotonic_rise() {
    let rsi = calculate_rsi(&rising_candles(30), 14).unwrap();
    assert_eq!(rsi, 100.0);
}

#[test]
fn rsi_stays_in_range_on_mixed_series() {
    let closes: Vec<f64> = (0..60)
        .map(|i| 100.0 + ((i * 7) % 13) as f64 - 6.0)
        .collect();
    let rsi = calculate_rsi(&candles_from_closes(&closes), 14).unwrap();
    assert!((0.0..=100.0).contains(&rsi), "RSI out of range: {}", rsi);
}

#[test]
fn rsi_insufficient_data() {
    assert!(calculate_rsi(&rising_candles(14), 14).is_none());
    assert!(calculate_rsi(&rising_candles(15), 14).is_some());
}

#[test]
fn stochastic_near_hundred_at_top_of_range() {
    let (k, d) = calculate_stochastic(&rising_candles(30), 14, 3).unwrap();
    assert!(k > 80.0, "expected overbought %K, got {}", k);
    assert!((0.0..=100.0).contains(&d));
}

#[test]
fn stochastic_near_zero_at_bottom_of_range() {
    let (k, _) = calculate_stochastic(&declining_candles(30), 14, 3).unwrap();
    assert!(k < 20.0, "expected oversold %K, got {}", k);
}

#[test]
fn stochastic_insufficient_data() {
    assert!(calculate_stochastic(&rising_candles(15), 14, 3).is_none());
    assert!(calculate_stochastic(&rising_candles(16), 14, 3).is_some());
}

#[test]
fn cci_positive_in_uptrend_negative_in_downtrend() {
    assert!(calculate_cci(&rising_candles(40), 20).unwrap() > 0.0);
    assert!(calculate_cci(&declining_candles(40), 20).unwrap() < 0.0);
}

#[test]
fn cci_zero_on_flat_series() {
    let candles = candles_from_closes(&vec![100.0; 40]);
    assert_eq!(calculate_cci(&candles, 20), Some(0.0));
}

#[test]
fn williams_r_stays_in_range() {
    let willr = calculate_williams_r(&rising_candles(30), 14).unwrap();
    assert!((-100.0..=0.0).contains(&willr), "out of range: {}", willr);
    assert!(willr > -20.0, "rising close should read overbought: {}", willr);

    let willr = calculate_williams_r(&declining_candles(30), 14).unwrap();
    assert!(willr < -80.0, "falling close should read oversold: {}", willr);
}

#[test]
fn roc_measures_percent_change() {
    // Close moved from 100 to 110 over the last 10 bars.
    let closes: Vec<f64> = (0..=10).map(|i| 100.0 + i as f64).collect();
    let roc = calculate_roc(&candles_from_closes(&closes), 10).unwrap();
    assert!((roc - 10.0).abs() < 1e-9, "expected 10%, got {}", roc);
}

#[test]
fn momentum_measures_absolute_change() {
    let closes: Vec<f64> = (0..=10).map(|i| 100.0 + i as f64).collect();
    let mom = calculate_momentum(&candles_from_closes(&closes), 10).unwrap();
    assert!((mom - 10.0).abs() < 1e-9);
}
