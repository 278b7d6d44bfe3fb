use tracing::debug;

use super::{AssignedBucket, BucketAssignment, Bounds};
use crate::errors::FeatureError;
use crate::table::FeatureTable;

/// Rescales the columns of every normalizing bucket to `(v - min) / (max - min)`.
///
/// Returns a new table; `table` is never modified. Every bucket is checked
/// before any value is rescaled, so on error nothing has been computed.
/// Columns of non-normalizing buckets (including `others`) are copied as is.
pub fn normalize(
    table: &FeatureTable,
    assignment: &BucketAssignment,
) -> Result<FeatureTable, FeatureError> {
    apply(table, assignment, |bounds, value| bounds.rescale(value))
}

/// Inverse of [`normalize`]: maps rescaled columns back to their original units.
pub fn denormalize(
    table: &FeatureTable,
    assignment: &BucketAssignment,
) -> Result<FeatureTable, FeatureError> {
    apply(table, assignment, |bounds, value| bounds.restore(value))
}

fn apply(
    table: &FeatureTable,
    assignment: &BucketAssignment,
    map: impl Fn(&Bounds, f64) -> f64,
) -> Result<FeatureTable, FeatureError> {
    let plan: Vec<(&AssignedBucket, Bounds)> = assignment
        .iter()
        .filter(|bucket| bucket.normalize && !bucket.columns.is_empty())
        .map(|bucket| checked_bounds(bucket, table).map(|bounds| (bucket, bounds)))
        .collect::<Result<_, _>>()?;

    let mut output = table.clone();
    for (bucket, bounds) in plan {
        for name in &bucket.columns {
            let values = output
                .column_mut(name)
                .ok_or_else(|| FeatureError::missing(name.as_str()))?;
            for value in values.iter_mut() {
                *value = map(&bounds, *value);
            }
        }
        debug!(
            bucket = %bucket.name,
            columns = bucket.columns.len(),
            min = bounds.min,
            max = bounds.max,
            "rescaled bucket"
        );
    }

    Ok(output)
}

/// Bounds of a normalizing bucket, provided they are usable and every column exists.
fn checked_bounds(bucket: &AssignedBucket, table: &FeatureTable) -> Result<Bounds, FeatureError> {
    let bounds = bucket.bounds.unwrap_or(Bounds::new(f64::NAN, f64::NAN, 0.0));
    if bounds.is_degenerate() {
        return Err(FeatureError::DegenerateRange {
            bucket: bucket.name.clone(),
            min: bounds.min,
            max: bounds.max,
        });
    }

    if let Some(missing) = bucket.columns.iter().find(|c| !table.contains(c)) {
        return Err(FeatureError::missing(missing.as_str()));
    }

    Ok(bounds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BucketSpec, RangeConfig};
    use crate::ranges::classify;
    use approx::assert_relative_eq;

    fn sample_table() -> FeatureTable {
        FeatureTable::from_columns([
            ("close", vec![90.0, 140.0, 115.0]),
            ("ROC_10", vec![-45.0, 60.0, f64::NAN]),
            ("WILLR_14", vec![-100.0, -20.0, 0.0]),
            ("volume", vec![1e6, 2e6, 3e6]),
        ])
        .unwrap()
    }

    fn sample_config() -> RangeConfig {
        RangeConfig::new(vec![
            BucketSpec::new("prices").dynamic().with_reference("close"),
            BucketSpec::new("-100_0")
                .with_prefixes(["WILLR"])
                .normalized()
                .with_bounds(-100.0, 0.0, 1e-4),
            BucketSpec::new("-100_100")
                .with_prefixes(["ROC"])
                .normalized()
                .with_bounds(-100.0, 100.0, 1e-4),
        ])
    }

    #[test]
    fn test_normalize_rescales_bucketed_columns() {
        let table = sample_table();
        let assignment = classify(&table, &sample_config()).unwrap();
        let normalized = normalize(&table, &assignment).unwrap();

        let roc = normalized.column("ROC_10").unwrap();
        assert_relative_eq!(roc[0], 0.275);
        assert_relative_eq!(roc[1], 0.8);
        assert!(roc[2].is_nan());

        assert_eq!(normalized.column("WILLR_14").unwrap(), &[0.0, 0.8, 1.0]);
    }

    #[test]
    fn test_unnormalized_columns_untouched() {
        let table = sample_table();
        let assignment = classify(&table, &sample_config()).unwrap();
        let normalized = normalize(&table, &assignment).unwrap();

        for name in ["close", "volume"] {
            let before: Vec<u64> = table.column(name).unwrap().iter().map(|v| v.to_bits()).collect();
            let after: Vec<u64> =
                normalized.column(name).unwrap().iter().map(|v| v.to_bits()).collect();
            assert_eq!(before, after, "{name}");
        }
    }

    #[test]
    fn test_denormalize_round_trip() {
        let table = sample_table();
        let assignment = classify(&table, &sample_config()).unwrap();
        let restored = denormalize(&normalize(&table, &assignment).unwrap(), &assignment).unwrap();

        let original = table.column("ROC_10").unwrap();
        let back = restored.column("ROC_10").unwrap();
        assert_relative_eq!(back[0], original[0], epsilon = 1e-9);
        assert_relative_eq!(back[1], original[1], epsilon = 1e-9);
    }

    #[test]
    fn test_degenerate_bounds_rejected() {
        let table = FeatureTable::from_columns([
            ("close", vec![100.0, 100.0]),
            ("KAMA_10_2_30", vec![100.0, 100.0]),
        ])
        .unwrap();
        let config = RangeConfig::new(vec![
            BucketSpec::new("prices")
                .with_prefixes(["KAMA"])
                .dynamic()
                .normalized()
                .with_reference("close"),
        ]);
        let assignment = classify(&table, &config).unwrap();

        let err = normalize(&table, &assignment).unwrap_err();
        assert_eq!(
            err,
            FeatureError::DegenerateRange {
                bucket: "prices".into(),
                min: 100.0,
                max: 100.0
            }
        );
    }

    #[test]
    fn test_empty_normalizing_bucket_skips_bounds_check() {
        let table = FeatureTable::from_columns([("x", vec![5.0])]).unwrap();
        let config = RangeConfig::new(vec![
            BucketSpec::new("flat").with_prefixes(["ROC"]).normalized().with_bounds(1.0, 1.0, 0.0),
        ]);
        let assignment = classify(&table, &config).unwrap();
        assert_eq!(normalize(&table, &assignment).unwrap(), table);
    }
}
