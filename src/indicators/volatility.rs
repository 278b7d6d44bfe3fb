//! Volatility indicators: True Range (TR), Average True Range (ATR) and Normalized ATR

use crate::indicators::moving_averages::sma_series;

/// Calculates the True Range for a single row.
///
/// True Range is the greatest of:
/// - Current High - Current Low (candle range)
/// - |Current High - Previous Close|
/// - |Current Low - Previous Close|
///
/// For the first row (no previous close), returns the candle's range.
pub fn true_range(high: f64, low: f64, prev_close: Option<f64>) -> f64 {
    let range = high - low;
    match prev_close {
        Some(prev) => {
            let high_prev = (high - prev).abs();
            let low_prev = (low - prev).abs();
            range.max(high_prev).max(low_prev)
        }
        None => range,
    }
}

/// True Range for every row.
pub fn true_range_series(highs: &[f64], lows: &[f64], closes: &[f64]) -> Vec<f64> {
    (0..closes.len())
        .map(|i| {
            let prev_close = if i > 0 { Some(closes[i - 1]) } else { None };
            true_range(highs[i], lows[i], prev_close)
        })
        .collect()
}

/// Average True Range: the simple average of the last `period` True Range values.
pub fn atr_series(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Vec<f64> {
    sma_series(&true_range_series(highs, lows, closes), period)
}

/// Normalized ATR: 100 * ATR / close.
pub fn natr_series(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Vec<f64> {
    atr_series(highs, lows, closes, period)
        .iter()
        .zip(closes)
        .map(|(atr, close)| if *close == 0.0 { f64::NAN } else { 100.0 * atr / close })
        .collect()
}
