use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::indicators::IndicatorParams;
use crate::ranges::Bounds;
use crate::table::CLOSE;

/// Slack used by every static bucket.
pub const DEFAULT_TOLERANCE: f64 = 1e-4;

// ---------------------------------------------------------------------------
// Top-level aggregate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub ranges: RangeConfig,
    pub indicators: IndicatorSettings,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// Range buckets
// ---------------------------------------------------------------------------

/// Ordered bucket declarations. Order is the tie-break for both prefix
/// claims and dynamic absorption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeConfig {
    pub buckets: Vec<BucketSpec>,
}

impl RangeConfig {
    pub fn new(buckets: Vec<BucketSpec>) -> Self {
        Self { buckets }
    }
}

impl Default for RangeConfig {
    /// Price-difference, price-level and bounded-oscillator buckets for the
    /// usual TA indicator names.
    fn default() -> Self {
        let bounded = |name: &str, min: f64, max: f64| {
            BucketSpec::new(name).normalized().with_bounds(min, max, DEFAULT_TOLERANCE)
        };

        Self::new(vec![
            BucketSpec::new("diff_prices")
                .with_prefixes(["AO", "APO", "ATR", "DPO", "MACD", "MACDH", "MACDS", "MOM", "QS"]),
            BucketSpec::new("prices")
                .with_prefixes(["KAMA"])
                .dynamic()
                .with_reference(CLOSE),
            bounded("0_1", 0.0, 1.0).dynamic(),
            bounded("-1_1", -1.0, 1.0).with_prefixes(["PCTRET"]).dynamic(),
            bounded("0_100", 0.0, 100.0).with_prefixes(["NATR"]).dynamic(),
            bounded("-100_0", -100.0, 0.0).with_prefixes(["WILLR"]).dynamic(),
            bounded("-100_100", -100.0, 100.0)
                .with_prefixes(["ROC", "PPO", "PPOH", "PPOS", "TRIX", "TSI", "UO"])
                .dynamic(),
            bounded("-200_200", -200.0, 200.0).with_prefixes(["COPC"]),
            bounded("-100000_100000", -100_000.0, 100_000.0).with_prefixes(["KST"]),
        ])
    }
}

/// Declaration of one semantic range bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BucketSpec {
    pub name: String,
    /// Columns named `<prefix>_...` belong here regardless of their values.
    #[serde(default)]
    pub prefixes: Vec<String>,
    /// Test unclaimed columns against this bucket's bounds.
    #[serde(default)]
    pub dynamic: bool,
    #[serde(default)]
    pub normalize: bool,
    #[serde(default)]
    pub bounds: Option<Bounds>,
    /// Derive bounds from this column's min, max and standard deviation.
    #[serde(default)]
    pub reference_column: Option<String>,
    /// Claim the reference column itself during the name-based pass.
    #[serde(default = "default_true")]
    pub claim_reference: bool,
}

impl BucketSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prefixes: Vec::new(),
            dynamic: false,
            normalize: false,
            bounds: None,
            reference_column: None,
            claim_reference: true,
        }
    }

    pub fn with_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prefixes.extend(prefixes.into_iter().map(Into::into));
        self
    }

    pub fn dynamic(mut self) -> Self {
        self.dynamic = true;
        self
    }

    pub fn normalized(mut self) -> Self {
        self.normalize = true;
        self
    }

    pub fn with_bounds(mut self, min: f64, max: f64, tolerance: f64) -> Self {
        self.bounds = Some(Bounds::new(min, max, tolerance));
        self
    }

    pub fn with_reference(mut self, column: impl Into<String>) -> Self {
        self.reference_column = Some(column.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Indicator generation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorSettings {
    /// Kinds to compute. Empty means every kind the source offers.
    pub kinds: Vec<String>,
    /// Kinds never computed, matched case-insensitively.
    pub exclude: Vec<String>,
    /// Per-kind parameters; absent kinds use their defaults.
    pub params: BTreeMap<String, IndicatorParams>,
    /// Drop every row holding a missing value after generation.
    pub drop_incomplete_rows: bool,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        Self {
            kinds: Vec::new(),
            exclude: Vec::new(),
            params: BTreeMap::new(),
            drop_incomplete_rows: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level for this crate; `RUST_LOG` takes precedence.
    pub level: String,
    /// Emit JSON lines instead of compact text.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

fn default_true() -> bool {
    true
}
