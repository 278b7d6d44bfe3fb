use approx::assert_relative_eq;

use ta_features::ranges::OTHERS;
use ta_features::{
    BucketSpec, FeatureError, FeatureTable, RangeConfig, classify, denormalize, normalize,
};

fn scenario_table() -> FeatureTable {
    FeatureTable::from_columns([
        ("ROC_10", vec![-45.0, 12.0, 60.0, 3.5, -10.0]),
        ("close", vec![90.0, 105.0, 140.0, 120.0, 112.0]),
        ("WEIRD", vec![-5.0, 0.0, 5.0, 2.5, -1.0]),
    ])
    .unwrap()
}

fn scenario_config() -> RangeConfig {
    RangeConfig::new(vec![
        BucketSpec::new("prices").dynamic().with_reference("close"),
        BucketSpec::new("0_1").dynamic().normalized().with_bounds(0.0, 1.0, 1e-4),
        BucketSpec::new("-100_100")
            .with_prefixes(["ROC"])
            .dynamic()
            .normalized()
            .with_bounds(-100.0, 100.0, 1e-4),
    ])
}

#[test]
fn test_scenario_assignment() {
    let assignment = classify(&scenario_table(), &scenario_config()).unwrap();

    assert_eq!(assignment.bucket_of("ROC_10"), Some("-100_100"));
    assert_eq!(assignment.bucket_of("close"), Some("prices"));
    // -5..5 misses prices (90..140 +/- std) and 0_1, fits -100_100 dynamically
    assert_eq!(assignment.bucket_of("WEIRD"), Some("-100_100"));
    assert!(assignment.others().is_empty());
}

#[test]
fn test_scenario_without_wide_bucket_leaves_others() {
    let config = RangeConfig::new(scenario_config().buckets.into_iter().take(2).collect());
    let assignment = classify(&scenario_table(), &config).unwrap();

    assert_eq!(assignment.others(), &["ROC_10".to_string(), "WEIRD".to_string()]);
    assert_eq!(assignment.bucket_of("WEIRD"), Some(OTHERS));
}

#[test]
fn test_partition_with_default_config() {
    let table = FeatureTable::from_columns([
        ("open", vec![100.0, 101.0, 99.0]),
        ("close", vec![101.0, 99.0, 100.0]),
        ("volume", vec![5e5, 7e5, 6e5]),
        ("KAMA_10_2_30", vec![100.5, 100.2, 100.1]),
        ("MACD_12_26_9", vec![0.4, -0.2, 0.1]),
        ("MACDH_12_26_9", vec![0.1, -0.1, 0.0]),
        ("RSI_14", vec![45.0, 55.0, 70.0]),
        ("WILLR_14", vec![-80.0, -20.0, -50.0]),
        ("PCTRET_1", vec![0.01, -0.02, 0.01]),
        ("STOCH_14", vec![0.2, 0.9, 0.5]),
        ("KST_10_15", vec![-5e4, 2e4, 3e3]),
        ("OBV", vec![5e5, -2e5, 4e5]),
    ])
    .unwrap();

    let assignment = classify(&table, &RangeConfig::default()).unwrap();

    let mut seen: Vec<&str> = assignment
        .iter()
        .flat_map(|b| b.columns.iter().map(String::as_str))
        .collect();
    let total = seen.len();
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), total, "a column landed in two buckets");

    let mut expected = table.column_names();
    expected.sort();
    assert_eq!(seen, expected);

    assert_eq!(assignment.bucket_of("MACD_12_26_9"), Some("diff_prices"));
    assert_eq!(assignment.bucket_of("MACDH_12_26_9"), Some("diff_prices"));
    assert_eq!(assignment.bucket_of("KAMA_10_2_30"), Some("prices"));
    assert_eq!(assignment.bucket_of("open"), Some("prices"));
    assert_eq!(assignment.bucket_of("STOCH_14"), Some("0_1"));
    assert_eq!(assignment.bucket_of("PCTRET_1"), Some("-1_1"));
    assert_eq!(assignment.bucket_of("RSI_14"), Some("0_100"));
    assert_eq!(assignment.bucket_of("WILLR_14"), Some("-100_0"));
    assert_eq!(assignment.bucket_of("KST_10_15"), Some("-100000_100000"));
    assert_eq!(assignment.bucket_of("volume"), Some(OTHERS));
    assert_eq!(assignment.bucket_of("OBV"), Some(OTHERS));
}

#[test]
fn test_classification_ignores_column_order() {
    let table = scenario_table();
    let mut reversed = FeatureTable::new();
    for column in table.columns().iter().rev() {
        reversed.insert_column(column.name.clone(), column.values.clone()).unwrap();
    }

    let config = scenario_config();
    assert_eq!(
        classify(&table, &config).unwrap(),
        classify(&reversed, &config).unwrap()
    );
}

#[test]
fn test_normalize_then_denormalize() {
    let table = scenario_table();
    let assignment = classify(&table, &scenario_config()).unwrap();

    let normalized = normalize(&table, &assignment).unwrap();
    let roc = normalized.column("ROC_10").unwrap();
    for v in roc {
        assert!((0.0..=1.0).contains(v));
    }

    let restored = denormalize(&normalized, &assignment).unwrap();
    for (a, b) in restored
        .column("ROC_10")
        .unwrap()
        .iter()
        .zip(table.column("ROC_10").unwrap())
    {
        assert_relative_eq!(*a, *b, epsilon = 1e-9);
    }
    assert_eq!(restored.column("close"), table.column("close"));
}

#[test]
fn test_degenerate_reference_bucket_leaves_table_untouched() {
    let table = FeatureTable::from_columns([
        ("close", vec![50.0, 50.0, 50.0]),
        ("ROC_10", vec![1.0, 2.0, 3.0]),
    ])
    .unwrap();
    let config = RangeConfig::new(vec![
        BucketSpec::new("-100_100").with_prefixes(["ROC"]).normalized().with_bounds(-100.0, 100.0, 0.0),
        BucketSpec::new("prices").dynamic().normalized().with_reference("close"),
    ]);

    let assignment = classify(&table, &config).unwrap();
    let before = table.clone();
    let err = normalize(&table, &assignment).unwrap_err();

    assert!(matches!(err, FeatureError::DegenerateRange { ref bucket, .. } if bucket == "prices"));
    assert_eq!(table, before);
}

#[test]
fn test_normalize_with_foreign_assignment() {
    let table = scenario_table();
    let assignment = classify(&table, &scenario_config()).unwrap();
    let other = FeatureTable::from_columns([("close", vec![1.0, 2.0])]).unwrap();

    let err = normalize(&other, &assignment).unwrap_err();
    assert!(matches!(err, FeatureError::MissingColumn { .. }));
}
