//! Built-in indicator source backed by the indicator modules of this crate.

use std::str::FromStr;

use crate::errors::FeatureError;
use crate::indicators::momentum::{
    macd_series, mom_series, pctret_series, roc_series, rsi_series, willr_series,
};
use crate::indicators::moving_averages::{ema_series, kama_series, sma_series};
use crate::indicators::volatility::{atr_series, natr_series, true_range_series};
use crate::indicators::{IndicatorColumn, IndicatorParams, IndicatorSource};
use crate::table::{CLOSE, FeatureTable, HIGH, LOW};

/// Indicator kinds computed by [`Library`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorKind {
    Sma,
    Ema,
    Kama,
    Rsi,
    Roc,
    Mom,
    Macd,
    Willr,
    Pctret,
    TrueRange,
    Atr,
    Natr,
}

impl IndicatorKind {
    pub const ALL: [IndicatorKind; 12] = [
        IndicatorKind::Sma,
        IndicatorKind::Ema,
        IndicatorKind::Kama,
        IndicatorKind::Rsi,
        IndicatorKind::Roc,
        IndicatorKind::Mom,
        IndicatorKind::Macd,
        IndicatorKind::Willr,
        IndicatorKind::Pctret,
        IndicatorKind::TrueRange,
        IndicatorKind::Atr,
        IndicatorKind::Natr,
    ];

    /// Returns the column prefix used for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            IndicatorKind::Sma => "SMA",
            IndicatorKind::Ema => "EMA",
            IndicatorKind::Kama => "KAMA",
            IndicatorKind::Rsi => "RSI",
            IndicatorKind::Roc => "ROC",
            IndicatorKind::Mom => "MOM",
            IndicatorKind::Macd => "MACD",
            IndicatorKind::Willr => "WILLR",
            IndicatorKind::Pctret => "PCTRET",
            IndicatorKind::TrueRange => "TRUERANGE",
            IndicatorKind::Atr => "ATR",
            IndicatorKind::Natr => "NATR",
        }
    }

    fn default_length(&self) -> usize {
        match self {
            IndicatorKind::Sma | IndicatorKind::Ema | IndicatorKind::Kama => 10,
            IndicatorKind::Roc | IndicatorKind::Mom => 10,
            IndicatorKind::Rsi | IndicatorKind::Willr => 14,
            IndicatorKind::Atr | IndicatorKind::Natr => 14,
            IndicatorKind::Pctret | IndicatorKind::TrueRange => 1,
            IndicatorKind::Macd => 12,
        }
    }
}

impl FromStr for IndicatorKind {
    type Err = FeatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IndicatorKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| FeatureError::UnknownIndicator { kind: s.to_string() })
    }
}

impl std::fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Indicator library shipped with the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct Library;

impl Library {
    pub fn new() -> Self {
        Self
    }

    fn compute_kind(
        &self,
        kind: IndicatorKind,
        table: &FeatureTable,
        params: &IndicatorParams,
    ) -> Result<Vec<IndicatorColumn>, FeatureError> {
        let closes = table.require(CLOSE)?;
        let length = positive(kind, "length", params.length.unwrap_or(kind.default_length()))?;
        let name = |suffix: String| format!("{kind}_{suffix}");

        let columns = match kind {
            IndicatorKind::Sma => vec![(name(length.to_string()), sma_series(closes, length))],
            IndicatorKind::Ema => vec![(name(length.to_string()), ema_series(closes, length))],
            IndicatorKind::Kama => {
                let fast = positive(kind, "fast", params.fast.unwrap_or(2))?;
                let slow = positive(kind, "slow", params.slow.unwrap_or(30))?;
                vec![(
                    name(format!("{length}_{fast}_{slow}")),
                    kama_series(closes, length, fast, slow),
                )]
            }
            IndicatorKind::Rsi => vec![(name(length.to_string()), rsi_series(closes, length))],
            IndicatorKind::Roc => vec![(name(length.to_string()), roc_series(closes, length))],
            IndicatorKind::Mom => vec![(name(length.to_string()), mom_series(closes, length))],
            IndicatorKind::Pctret => {
                vec![(name(length.to_string()), pctret_series(closes, length))]
            }
            IndicatorKind::Macd => {
                // `length` doubles as the fast period when `fast` is absent
                let fast = positive(kind, "fast", params.fast.unwrap_or(length))?;
                let slow = positive(kind, "slow", params.slow.unwrap_or(26))?;
                let signal = positive(kind, "signal", params.signal.unwrap_or(9))?;
                if fast >= slow {
                    return Err(FeatureError::InvalidParameter {
                        kind: kind.to_string(),
                        reason: format!("fast ({fast}) must be below slow ({slow})"),
                    });
                }
                let suffix = format!("{fast}_{slow}_{signal}");
                let macd = macd_series(closes, fast, slow, signal);
                vec![
                    (format!("MACD_{suffix}"), macd.macd),
                    (format!("MACDH_{suffix}"), macd.histogram),
                    (format!("MACDS_{suffix}"), macd.signal),
                ]
            }
            IndicatorKind::Willr => {
                let (highs, lows) = (table.require(HIGH)?, table.require(LOW)?);
                vec![(name(length.to_string()), willr_series(highs, lows, closes, length))]
            }
            IndicatorKind::TrueRange => {
                let (highs, lows) = (table.require(HIGH)?, table.require(LOW)?);
                vec![(name("1".to_string()), true_range_series(highs, lows, closes))]
            }
            IndicatorKind::Atr => {
                let (highs, lows) = (table.require(HIGH)?, table.require(LOW)?);
                vec![(name(length.to_string()), atr_series(highs, lows, closes, length))]
            }
            IndicatorKind::Natr => {
                let (highs, lows) = (table.require(HIGH)?, table.require(LOW)?);
                vec![(name(length.to_string()), natr_series(highs, lows, closes, length))]
            }
        };

        Ok(columns)
    }
}

impl IndicatorSource for Library {
    fn available(&self) -> Vec<&'static str> {
        IndicatorKind::ALL.iter().map(IndicatorKind::as_str).collect()
    }

    fn compute(
        &self,
        kind: &str,
        table: &FeatureTable,
        params: &IndicatorParams,
    ) -> Result<Vec<IndicatorColumn>, FeatureError> {
        self.compute_kind(kind.parse()?, table, params)
    }
}

fn positive(kind: IndicatorKind, field: &str, value: usize) -> Result<usize, FeatureError> {
    if value == 0 {
        return Err(FeatureError::InvalidParameter {
            kind: kind.to_string(),
            reason: format!("{field} must be positive"),
        });
    }
    Ok(value)
}
