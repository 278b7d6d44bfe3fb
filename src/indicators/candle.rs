//! Candle (OHLCV) data structure with timestamp

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Represents a single candlestick with OHLCV data and timestamp.
///
/// The timestamp is stored as Unix time in milliseconds, which is the format
/// used by most cryptocurrency exchanges (Binance, Coinbase, etc.).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candle {
    /// Unix timestamp in milliseconds (candle open time)
    timestamp: u64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

impl Candle {
    /// Creates a new Candle.
    ///
    /// `timestamp` should be Unix time in milliseconds (candle open time).
    /// Use `0` for the timestamp if not available (e.g., in tests).
    pub fn new(
        timestamp: u64,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Returns the candle's timestamp (Unix time in milliseconds).
    pub fn get_timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn get_open(&self) -> f64 {
        self.open
    }

    pub fn get_high(&self) -> f64 {
        self.high
    }

    pub fn get_low(&self) -> f64 {
        self.low
    }

    pub fn get_close(&self) -> f64 {
        self.close
    }

    pub fn get_volume(&self) -> f64 {
        self.volume
    }
}

// Design: candles arrive either as plain objects or as exchange kline rows
// (`[open_time, "open", "high", "low", "close", "volume", ...]`, prices as
// strings on Binance). Both shapes deserialize into the same Candle.
#[derive(Deserialize)]
#[serde(untagged)]
enum CandleRecord {
    Object {
        #[serde(default)]
        timestamp: u64,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    },
    Kline(Vec<Value>),
}

impl<'de> Deserialize<'de> for Candle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match CandleRecord::deserialize(deserializer)? {
            CandleRecord::Object {
                timestamp,
                open,
                high,
                low,
                close,
                volume,
            } => Ok(Candle::new(timestamp, open, high, low, close, volume)),
            CandleRecord::Kline(fields) => {
                if fields.len() < 6 {
                    return Err(D::Error::custom(format!(
                        "kline row needs 6 fields, got {}",
                        fields.len()
                    )));
                }
                let number = |i: usize| {
                    kline_number(&fields[i])
                        .ok_or_else(|| D::Error::custom(format!("kline field {i} is not numeric")))
                };
                Ok(Candle::new(
                    number(0)? as u64,
                    number(1)?,
                    number(2)?,
                    number(3)?,
                    number(4)?,
                    number(5)?,
                ))
            }
        }
    }
}

/// Reads a kline field that may be a JSON number or a numeric string.
fn kline_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse::<f64>().ok(),
        _ => None,
    }
}
