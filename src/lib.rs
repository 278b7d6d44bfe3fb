//! Technical-analysis feature preparation.
//!
//! Indicator columns are generated over OHLCV data, every column is assigned
//! to a value-range bucket, and bucketed columns are rescaled:
//!
//! ```text
//! candles -> FeatureTable -> generate_features -> classify -> normalize
//! ```
//!
//! The bucket table is plain configuration ([`config::RangeConfig`]), passed
//! explicitly to [`ranges::classify`].

pub mod config;
pub mod errors;
pub mod indicators;
pub mod logging;
pub mod pipeline;
pub mod ranges;
pub mod table;

// Re-exports for convenience
pub use config::{BucketSpec, PipelineConfig, RangeConfig};
pub use errors::FeatureError;
pub use indicators::{Candle, IndicatorSource, Library};
pub use ranges::{BucketAssignment, Bounds, classify, denormalize, normalize};
pub use table::FeatureTable;
