//! Range classification and normalization of feature columns.
//!
//! [`classify`] assigns every column of a [`FeatureTable`](crate::table::FeatureTable)
//! to exactly one bucket of a [`RangeConfig`](crate::config::RangeConfig):
//! first by indicator-name prefix, then by testing the observed value range
//! of the leftover columns against each dynamic bucket in declaration order.
//! Columns nothing claims end up in [`OTHERS`].
//!
//! [`normalize`] then rescales the columns of every normalizing bucket with
//! `(v - min) / (max - min)`. The rescale is linear and never clamps, so
//! outliers stay visible outside `[0, 1]`.

mod assignment;
mod classifier;
mod normalizer;

use serde::{Deserialize, Serialize};

pub use assignment::{AssignedBucket, BucketAssignment};
pub use classifier::classify;
pub use normalizer::{denormalize, normalize};

/// Name of the residual bucket. Never normalized.
pub const OTHERS: &str = "others";

/// Value range of a bucket plus the slack allowed when testing columns against it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
    pub tolerance: f64,
}

impl Bounds {
    pub fn new(min: f64, max: f64, tolerance: f64) -> Self {
        Self { min, max, tolerance }
    }

    /// Dynamic eligibility test for an observed `[min, max]` range.
    pub fn contains(&self, observed_min: f64, observed_max: f64) -> bool {
        observed_max <= self.max + self.tolerance && observed_min >= self.min - self.tolerance
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    /// True when the bounds cannot be used as a rescale denominator.
    pub fn is_degenerate(&self) -> bool {
        let width = self.width();
        !(width.is_finite() && width > 0.0)
    }

    /// Maps `value` linearly so that `min -> 0` and `max -> 1`.
    pub fn rescale(&self, value: f64) -> f64 {
        (value - self.min) / self.width()
    }

    /// Inverse of [`rescale`](Self::rescale).
    pub fn restore(&self, value: f64) -> f64 {
        value * self.width() + self.min
    }
}
