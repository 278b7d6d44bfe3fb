//! Moving Average indicators: SMA, EMA and Kaufman's Adaptive Moving Average (KAMA)
//!
//! Every series here has the same length as its input. Positions without
//! enough history hold `NaN`.

/// Calculates the Simple Moving Average (SMA) series.
///
/// SMA = (V1 + V2 + ... + Vn) / n over each trailing window of `period`
/// values. A window containing a missing value yields `NaN`.
pub fn sma_series(values: &[f64], period: usize) -> Vec<f64> {
    let mut sma_values = vec![f64::NAN; values.len()];
    if period == 0 || values.len() < period {
        return sma_values;
    }

    for i in (period - 1)..values.len() {
        let start = i + 1 - period;
        let sum: f64 = values[start..=i].iter().sum();
        sma_values[i] = sum / period as f64;
    }

    sma_values
}

/// Calculates the Exponential Moving Average (EMA) series.
///
/// EMA = V * multiplier + EMA_prev * (1 - multiplier)
/// where multiplier = 2 / (period + 1)
///
/// Leading missing values are skipped, so the EMA of a series that itself
/// starts with a warm-up gap (e.g. the MACD line) is still defined. The first
/// EMA value is seeded with the SMA of the first `period` defined values.
pub fn ema_series(values: &[f64], period: usize) -> Vec<f64> {
    let mut ema_values = vec![f64::NAN; values.len()];
    let offset = values.iter().take_while(|v| v.is_nan()).count();

    if period == 0 || values.len() < offset + period {
        return ema_values;
    }

    let multiplier = 2.0 / (period as f64 + 1.0);
    let seed_index = offset + period - 1;

    let mut prev_ema = values[offset..=seed_index].iter().sum::<f64>() / period as f64;
    ema_values[seed_index] = prev_ema;

    for i in (seed_index + 1)..values.len() {
        prev_ema = values[i] * multiplier + prev_ema * (1.0 - multiplier);
        ema_values[i] = prev_ema;
    }

    ema_values
}

/// Calculates Kaufman's Adaptive Moving Average (KAMA) series.
///
/// The efficiency ratio ER = |V[i] - V[i-n]| / sum(|V[j] - V[j-1]|) scales the
/// smoothing constant between the `fast` and `slow` EMA constants:
/// SC = (ER * (fast_sc - slow_sc) + slow_sc)^2. KAMA is seeded with the value
/// at index `length - 1`. A flat window has ER = 0.
pub fn kama_series(values: &[f64], length: usize, fast: usize, slow: usize) -> Vec<f64> {
    let mut kama_values = vec![f64::NAN; values.len()];
    if length == 0 || values.len() < length {
        return kama_values;
    }

    let fast_sc = 2.0 / (fast as f64 + 1.0);
    let slow_sc = 2.0 / (slow as f64 + 1.0);

    let mut prev = values[length - 1];
    kama_values[length - 1] = prev;

    for i in length..values.len() {
        let change = (values[i] - values[i - length]).abs();
        let volatility: f64 = (i + 1 - length..=i)
            .map(|j| (values[j] - values[j - 1]).abs())
            .sum();
        let er = if volatility == 0.0 { 0.0 } else { change / volatility };
        let sc = (er * (fast_sc - slow_sc) + slow_sc).powi(2);

        prev += sc * (values[i] - prev);
        kama_values[i] = prev;
    }

    kama_values
}
