//! End-to-end feature preparation: generate indicators, classify, normalize.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{IndicatorSettings, PipelineConfig};
use crate::errors::FeatureError;
use crate::indicators::{IndicatorParams, IndicatorSource};
use crate::ranges::{BucketAssignment, classify, normalize};
use crate::table::FeatureTable;

/// What [`generate_features`] did to the table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    /// Indicator kinds computed, in order.
    pub indicators: Vec<String>,
    pub columns_added: usize,
    pub rows_dropped: usize,
}

/// Appends indicator columns from `source` to `table`.
///
/// Computes `settings.kinds` (or every kind the source offers when empty)
/// minus `settings.exclude`, each with its configured parameters. Then, when
/// `settings.drop_incomplete_rows` is set, drops every row that still holds a
/// missing value. On error the table may already hold some new columns.
pub fn generate_features(
    table: &mut FeatureTable,
    source: &dyn IndicatorSource,
    settings: &IndicatorSettings,
) -> Result<GenerationReport, FeatureError> {
    let requested: Vec<String> = if settings.kinds.is_empty() {
        source.available().into_iter().map(str::to_string).collect()
    } else {
        settings.kinds.clone()
    };

    let kinds: Vec<String> = requested
        .into_iter()
        .filter(|kind| !settings.exclude.iter().any(|e| e.eq_ignore_ascii_case(kind)))
        .collect();

    let mut report = GenerationReport::default();
    let total = kinds.len();

    for (i, kind) in kinds.into_iter().enumerate() {
        let params = params_for(settings, &kind);
        let columns = source.compute(&kind, table, &params)?;
        debug!(kind = %kind, columns = columns.len(), "{} of {} indicators", i + 1, total);

        report.columns_added += columns.len();
        for (name, values) in columns {
            table.insert_column(name, values)?;
        }
        report.indicators.push(kind);
    }

    if settings.drop_incomplete_rows {
        report.rows_dropped = table.drop_incomplete_rows();
        if report.rows_dropped > 0 {
            warn!(
                rows_dropped = report.rows_dropped,
                rows_left = table.len(),
                "dropped rows with missing values"
            );
        }
    }

    Ok(report)
}

/// Params for `kind`, looked up case-insensitively.
fn params_for(settings: &IndicatorSettings, kind: &str) -> IndicatorParams {
    settings
        .params
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(kind))
        .map(|(_, params)| *params)
        .unwrap_or_default()
}

/// Output of [`run`].
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutput {
    pub assignment: BucketAssignment,
    pub table: FeatureTable,
    pub report: GenerationReport,
}

/// Runs generation, classification and normalization over a raw OHLCV table.
pub fn run(
    mut table: FeatureTable,
    source: &dyn IndicatorSource,
    config: &PipelineConfig,
) -> Result<PipelineOutput, FeatureError> {
    let report = generate_features(&mut table, source, &config.indicators)?;
    info!(
        indicators = report.indicators.len(),
        columns = table.width(),
        rows = table.len(),
        "features generated"
    );

    let assignment = classify(&table, &config.ranges)?;
    for bucket in assignment.iter() {
        debug!(bucket = %bucket.name, columns = bucket.columns.len(), "bucket assigned");
    }
    if !assignment.others().is_empty() {
        info!(columns = ?assignment.others(), "columns left unclassified");
    }

    let table = normalize(&table, &assignment)?;

    Ok(PipelineOutput {
        assignment,
        table,
        report,
    })
}
