//! Momentum indicators: RSI, ROC, MOM, MACD, Williams %R and percent return

use crate::indicators::moving_averages::ema_series;

/// Calculates the Relative Strength Index (RSI) series.
///
/// RSI = 100 - (100 / (1 + RS))
/// where RS = Average Gain / Average Loss, smoothed with Wilder's method.
///
/// The first value lands at index `period` (it needs `period` price changes).
/// Oscillates between 0 and 100.
pub fn rsi_series(closes: &[f64], period: usize) -> Vec<f64> {
    let mut rsi_values = vec![f64::NAN; closes.len()];
    if period == 0 || closes.len() < period + 1 {
        return rsi_values;
    }

    let changes = price_changes(closes);
    let (gains, losses) = gains_and_losses(&changes);

    // Calculate initial averages using simple average
    let mut avg_gain: f64 = gains[..period].iter().sum::<f64>() / period as f64;
    let mut avg_loss: f64 = losses[..period].iter().sum::<f64>() / period as f64;
    rsi_values[period] = rsi_from_averages(avg_gain, avg_loss);

    // changes[i] is the move into closes[i + 1]
    for i in period..changes.len() {
        avg_gain = (avg_gain * (period - 1) as f64 + gains[i]) / period as f64;
        avg_loss = (avg_loss * (period - 1) as f64 + losses[i]) / period as f64;
        rsi_values[i + 1] = rsi_from_averages(avg_gain, avg_loss);
    }

    rsi_values
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        // No losses means RSI is 100 (maximum bullish)
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

/// Rate of Change: 100 * (V[i] - V[i-n]) / V[i-n]
pub fn roc_series(values: &[f64], length: usize) -> Vec<f64> {
    lagged(values, length, |current, past| {
        if past == 0.0 {
            f64::NAN
        } else {
            100.0 * (current - past) / past
        }
    })
}

/// Momentum: V[i] - V[i-n]
pub fn mom_series(values: &[f64], length: usize) -> Vec<f64> {
    lagged(values, length, |current, past| current - past)
}

/// Percent return: (V[i] - V[i-n]) / V[i-n]
pub fn pctret_series(values: &[f64], length: usize) -> Vec<f64> {
    lagged(values, length, |current, past| {
        if past == 0.0 {
            f64::NAN
        } else {
            current / past - 1.0
        }
    })
}

/// MACD line, histogram and signal line.
#[derive(Debug, Clone)]
pub struct MacdSeries {
    pub macd: Vec<f64>,
    pub histogram: Vec<f64>,
    pub signal: Vec<f64>,
}

/// Moving Average Convergence/Divergence.
///
/// MACD = EMA(fast) - EMA(slow), signal = EMA(MACD, signal),
/// histogram = MACD - signal.
pub fn macd_series(closes: &[f64], fast: usize, slow: usize, signal: usize) -> MacdSeries {
    let fast_ema = ema_series(closes, fast);
    let slow_ema = ema_series(closes, slow);

    let macd: Vec<f64> = fast_ema.iter().zip(&slow_ema).map(|(f, s)| f - s).collect();
    let signal_line = ema_series(&macd, signal);
    let histogram = macd.iter().zip(&signal_line).map(|(m, s)| m - s).collect();

    MacdSeries {
        macd,
        histogram,
        signal: signal_line,
    }
}

/// William's Percent R: -100 * (HH - close) / (HH - LL) over `length` rows.
///
/// Ranges from -100 to 0. A window with no range yields `NaN`.
pub fn willr_series(highs: &[f64], lows: &[f64], closes: &[f64], length: usize) -> Vec<f64> {
    let mut values = vec![f64::NAN; closes.len()];
    if length == 0 || closes.len() < length {
        return values;
    }

    for i in (length - 1)..closes.len() {
        let start = i + 1 - length;
        let highest = highs[start..=i].iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let lowest = lows[start..=i].iter().copied().fold(f64::INFINITY, f64::min);
        let range = highest - lowest;
        if range > 0.0 {
            values[i] = -100.0 * (highest - closes[i]) / range;
        }
    }

    values
}

/// Applies `f(current, past)` to each pair `length` rows apart.
fn lagged(values: &[f64], length: usize, f: impl Fn(f64, f64) -> f64) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if length == 0 {
        return out;
    }
    for i in length..values.len() {
        out[i] = f(values[i], values[i - length]);
    }
    out
}

/// Calculates price changes between consecutive values.
///
/// Returns a vector of changes where each value is: current - previous
fn price_changes(closes: &[f64]) -> Vec<f64> {
    closes.windows(2).map(|pair| pair[1] - pair[0]).collect()
}

/// Separates price changes into gains and losses.
///
/// Returns a tuple of (gains, losses) where:
/// - gains[i] = change if positive, else 0
/// - losses[i] = |change| if negative, else 0
fn gains_and_losses(changes: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let gains: Vec<f64> = changes.iter().map(|&c| if c > 0.0 { c } else { 0.0 }).collect();

    let losses: Vec<f64> = changes
        .iter()
        .map(|&c| if c < 0.0 { c.abs() } else { 0.0 })
        .collect();

    (gains, losses)
}
