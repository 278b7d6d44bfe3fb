use thiserror::Error;

/// Typed errors for feature generation, range classification and normalization.
///
/// Library code returns these directly; the binary and the config loader wrap
/// them with `anyhow::Context` for propagation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FeatureError {
    // -- Table --------------------------------------------------------------
    #[error("column not found: {column}")]
    MissingColumn { column: String },

    #[error("column {column} has {actual} rows, table has {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    // -- Normalization ------------------------------------------------------
    #[error("bucket {bucket} has degenerate bounds [{min}, {max}]")]
    DegenerateRange { bucket: String, min: f64, max: f64 },

    // -- Indicators ---------------------------------------------------------
    #[error("unknown indicator: {kind}")]
    UnknownIndicator { kind: String },

    #[error("invalid parameter for {kind}: {reason}")]
    InvalidParameter { kind: String, reason: String },
}

impl FeatureError {
    pub(crate) fn missing(column: impl Into<String>) -> Self {
        Self::MissingColumn {
            column: column.into(),
        }
    }
}
