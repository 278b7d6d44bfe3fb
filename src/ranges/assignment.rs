use serde::Serialize;

use super::{Bounds, OTHERS};

/// Columns that ended up in one bucket, with the bounds resolved for this run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignedBucket {
    pub name: String,
    /// Sorted, unique column names.
    pub columns: Vec<String>,
    pub bounds: Option<Bounds>,
    pub normalize: bool,
}

impl AssignedBucket {
    pub fn contains(&self, column: &str) -> bool {
        self.columns.binary_search_by(|c| c.as_str().cmp(column)).is_ok()
    }
}

/// Result of [`classify`](super::classify): a partition of the table's columns.
///
/// Buckets keep their configured order; the residual [`OTHERS`] bucket is last.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BucketAssignment {
    buckets: Vec<AssignedBucket>,
}

impl BucketAssignment {
    pub(crate) fn new(mut buckets: Vec<AssignedBucket>, mut others: Vec<String>) -> Self {
        others.sort();
        others.dedup();
        buckets.push(AssignedBucket {
            name: OTHERS.to_string(),
            columns: others,
            bounds: None,
            normalize: false,
        });
        Self { buckets }
    }

    pub fn bucket(&self, name: &str) -> Option<&AssignedBucket> {
        self.buckets.iter().find(|b| b.name == name)
    }

    /// Columns no rule claimed.
    pub fn others(&self) -> &[String] {
        // new() always appends the residual bucket
        self.buckets
            .last()
            .map(|b| b.columns.as_slice())
            .unwrap_or_default()
    }

    /// Name of the bucket holding `column`.
    pub fn bucket_of(&self, column: &str) -> Option<&str> {
        self.buckets
            .iter()
            .find(|b| b.contains(column))
            .map(|b| b.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssignedBucket> {
        self.buckets.iter()
    }

    /// Number of buckets, [`OTHERS`] included.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Total number of assigned columns.
    pub fn column_count(&self) -> usize {
        self.buckets.iter().map(|b| b.columns.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BucketAssignment {
        BucketAssignment::new(
            vec![AssignedBucket {
                name: "-100_100".into(),
                columns: vec!["ROC_10".into(), "TSI_13_25".into()],
                bounds: Some(Bounds::new(-100.0, 100.0, 1e-4)),
                normalize: true,
            }],
            vec!["volume".into(), "OBV".into(), "volume".into()],
        )
    }

    #[test]
    fn test_others_is_last_sorted_and_unique() {
        let assignment = sample();
        assert_eq!(assignment.len(), 2);
        assert_eq!(assignment.others(), &["OBV".to_string(), "volume".to_string()]);
        assert_eq!(assignment.iter().last().unwrap().name, OTHERS);
        assert!(!assignment.iter().last().unwrap().normalize);
    }

    #[test]
    fn test_lookup() {
        let assignment = sample();
        assert_eq!(assignment.bucket_of("ROC_10"), Some("-100_100"));
        assert_eq!(assignment.bucket_of("volume"), Some(OTHERS));
        assert_eq!(assignment.bucket_of("missing"), None);
        assert_eq!(assignment.column_count(), 4);
        assert!(assignment.bucket("-100_100").unwrap().contains("TSI_13_25"));
    }

    #[test]
    fn test_serializes_as_bucket_list() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json[0]["name"], "-100_100");
        assert_eq!(json[1]["name"], "others");
        assert!(json[1]["bounds"].is_null());
    }
}
