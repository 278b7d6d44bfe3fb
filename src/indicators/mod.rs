//! Technical indicators for feature generation
//!
//! The range classifier never calls indicator math directly. It only sees the
//! named columns an [`IndicatorSource`] appends to a [`FeatureTable`]. Every
//! column produced for kind `K` is named `K_<params>`, which is what the
//! prefix rules of the classifier match on.

pub mod candle;
pub mod library;
pub mod momentum;
pub mod moving_averages;
pub mod volatility;

use serde::{Deserialize, Serialize};

use crate::errors::FeatureError;
use crate::table::FeatureTable;

pub use candle::Candle;
pub use library::{IndicatorKind, Library};

/// A column produced by an indicator: `(name, values)`.
pub type IndicatorColumn = (String, Vec<f64>);

/// Parameters for a single indicator run.
///
/// Every field is optional; indicators fall back to their own defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndicatorParams {
    pub length: Option<usize>,
    pub fast: Option<usize>,
    pub slow: Option<usize>,
    pub signal: Option<usize>,
}

impl IndicatorParams {
    pub fn with_length(length: usize) -> Self {
        Self {
            length: Some(length),
            ..Self::default()
        }
    }
}

/// Source of indicator columns.
///
/// Implementations enumerate the kinds they support and compute the columns
/// of one kind over a table holding `open, high, low, close, volume`.
pub trait IndicatorSource {
    /// Names of every indicator kind this source can compute.
    fn available(&self) -> Vec<&'static str>;

    /// Computes the columns of `kind`.
    ///
    /// Returned columns have the table's row count, with `NaN` where the
    /// indicator has no value yet.
    fn compute(
        &self,
        kind: &str,
        table: &FeatureTable,
        params: &IndicatorParams,
    ) -> Result<Vec<IndicatorColumn>, FeatureError>;
}
