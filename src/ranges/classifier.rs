use std::collections::BTreeSet;

use tracing::{debug, warn};

use super::{AssignedBucket, BucketAssignment, Bounds};
use crate::config::{BucketSpec, RangeConfig};
use crate::errors::FeatureError;
use crate::table::{ColumnStats, FeatureTable};

/// Assigns every column of `table` to exactly one bucket of `config`.
///
/// Name-based claims come first and are final. Remaining columns are then
/// tested against each dynamic bucket in declaration order and absorbed by
/// the first one whose bounds hold their observed range. A column without any
/// defined value passes the first test it meets. Whatever is left goes to
/// [`OTHERS`](super::OTHERS).
///
/// Fails with [`FeatureError::MissingColumn`] when a reference column is not
/// in the table.
pub fn classify(
    table: &FeatureTable,
    config: &RangeConfig,
) -> Result<BucketAssignment, FeatureError> {
    for spec in &config.buckets {
        if let Some(reference) = &spec.reference_column {
            table.require(reference)?;
        }
    }

    // Sorted so the result never depends on table column order
    let mut remaining: BTreeSet<&str> = table.column_names().into_iter().collect();

    // -- Name-based pass -----------------------------------------------------
    let mut assigned: Vec<Vec<String>> = Vec::with_capacity(config.buckets.len());
    for spec in &config.buckets {
        assigned.push(claim_by_name(spec, &mut remaining));
    }

    // -- Resolve bounds ------------------------------------------------------
    let mut resolved: Vec<Option<Bounds>> = Vec::with_capacity(config.buckets.len());
    for spec in &config.buckets {
        resolved.push(resolve_bounds(spec, table)?);
    }

    // -- Dynamic pass --------------------------------------------------------
    let observed: Vec<(&str, ColumnStats)> = remaining
        .iter()
        .map(|&name| table.stats(name).map(|stats| (name, stats)))
        .collect::<Result<_, _>>()?;

    for (index, spec) in config.buckets.iter().enumerate() {
        if !spec.dynamic {
            continue;
        }
        // Validated configs always give dynamic buckets bounds
        let Some(bounds) = resolved[index] else {
            continue;
        };

        let before = assigned[index].len();
        for (name, stats) in &observed {
            if remaining.contains(name) && fits(stats, &bounds) {
                remaining.remove(name);
                assigned[index].push((*name).to_string());
            }
        }
        debug!(
            bucket = %spec.name,
            absorbed = assigned[index].len() - before,
            min = bounds.min,
            max = bounds.max,
            tolerance = bounds.tolerance,
            "dynamic range test"
        );
    }

    let buckets = config
        .buckets
        .iter()
        .zip(assigned)
        .zip(resolved)
        .map(|((spec, mut columns), bounds)| {
            columns.sort();
            columns.dedup();
            AssignedBucket {
                name: spec.name.clone(),
                columns,
                bounds,
                normalize: spec.normalize,
            }
        })
        .collect();

    let others: Vec<String> = remaining.into_iter().map(str::to_string).collect();
    Ok(BucketAssignment::new(buckets, others))
}

/// Claims the reference column (when configured) and every column matching
/// one of the bucket's prefixes, removing them from `remaining`.
fn claim_by_name(spec: &BucketSpec, remaining: &mut BTreeSet<&str>) -> Vec<String> {
    let mut claimed = Vec::new();

    if spec.claim_reference {
        if let Some(reference) = spec.reference_column.as_deref() {
            if remaining.remove(reference) {
                claimed.push(reference.to_string());
            }
        }
    }

    for prefix in &spec.prefixes {
        let matches: Vec<&str> = remaining
            .iter()
            .copied()
            .filter(|name| matches_prefix(name, prefix))
            .collect();

        if matches.is_empty() {
            // Indicators without enough history may not have been generated
            warn!(bucket = %spec.name, prefix = %prefix, "no column matches prefix");
            continue;
        }

        for name in matches {
            remaining.remove(name);
            claimed.push(name.to_string());
        }
    }

    claimed
}

/// `name` is `<prefix>_<anything>`.
fn matches_prefix(name: &str, prefix: &str) -> bool {
    name.strip_prefix(prefix)
        .is_some_and(|rest| rest.starts_with('_'))
}

/// Bounds for this run: statistics of the reference column, or the static bounds.
fn resolve_bounds(spec: &BucketSpec, table: &FeatureTable) -> Result<Option<Bounds>, FeatureError> {
    match &spec.reference_column {
        Some(reference) => {
            let stats = table.stats(reference)?;
            Ok(Some(Bounds::new(
                stats.min.unwrap_or(f64::NAN),
                stats.max.unwrap_or(f64::NAN),
                stats.std_dev.unwrap_or(0.0),
            )))
        }
        None => Ok(spec.bounds),
    }
}

fn fits(stats: &ColumnStats, bounds: &Bounds) -> bool {
    match (stats.min, stats.max) {
        (Some(min), Some(max)) => bounds.contains(min, max),
        // nothing observed, nothing out of range
        _ => true,
    }
}
