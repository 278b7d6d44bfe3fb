use anyhow::{bail, Result};
use std::collections::HashMap;

use super::types::{PipelineConfig, RangeConfig};
use crate::ranges::OTHERS;

/// Validate invariants across the config that serde alone cannot enforce.
///
/// Every problem is collected and reported in a single error. Called
/// automatically by [`super::load_config`].
pub fn validate_config(config: &PipelineConfig) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    validate_ranges(&config.ranges, &mut errors);
    validate_indicators(config, &mut errors);
    validate_logging(config, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        let msg = format!(
            "Configuration validation failed ({} error{}):\n  - {}",
            errors.len(),
            if errors.len() == 1 { "" } else { "s" },
            errors.join("\n  - ")
        );
        bail!("{msg}");
    }
}

// ---------------------------------------------------------------------------
// Range buckets
// ---------------------------------------------------------------------------

pub(crate) fn validate_ranges(ranges: &RangeConfig, errors: &mut Vec<String>) {
    let mut names: HashMap<&str, usize> = HashMap::new();
    let mut prefix_owners: HashMap<&str, &str> = HashMap::new();

    for (index, spec) in ranges.buckets.iter().enumerate() {
        let label = format!("ranges.buckets[{index}] ({})", spec.name);

        if spec.name.is_empty() {
            errors.push(format!("{label}: name is empty"));
        }
        if spec.name == OTHERS {
            errors.push(format!("{label}: name '{OTHERS}' is reserved"));
        }
        if let Some(first) = names.insert(spec.name.as_str(), index) {
            errors.push(format!("{label}: duplicate name (first declared at {first})"));
        }

        for prefix in &spec.prefixes {
            if prefix.is_empty() {
                errors.push(format!("{label}: empty prefix"));
                continue;
            }
            if let Some(owner) = prefix_owners.insert(prefix.as_str(), spec.name.as_str()) {
                errors.push(format!("{label}: prefix '{prefix}' already declared by {owner}"));
            }
        }

        match (&spec.bounds, &spec.reference_column) {
            (Some(_), Some(_)) => {
                errors.push(format!("{label}: set either bounds or reference_column, not both"));
            }
            (None, None) if spec.dynamic || spec.normalize => {
                errors.push(format!(
                    "{label}: dynamic or normalizing bucket needs bounds or a reference_column"
                ));
            }
            (Some(bounds), None) => {
                if !(bounds.min.is_finite() && bounds.max.is_finite()) {
                    errors.push(format!("{label}: bounds must be finite"));
                } else if bounds.min > bounds.max {
                    errors.push(format!(
                        "{label}: min ({}) is above max ({})",
                        bounds.min, bounds.max
                    ));
                }
                if !(bounds.tolerance.is_finite() && bounds.tolerance >= 0.0) {
                    errors.push(format!("{label}: tolerance must be a non-negative number"));
                }
            }
            (None, Some(column)) if column.is_empty() => {
                errors.push(format!("{label}: reference_column is empty"));
            }
            _ => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Indicators
// ---------------------------------------------------------------------------

fn validate_indicators(config: &PipelineConfig, errors: &mut Vec<String>) {
    let indicators = &config.indicators;

    for kind in &indicators.kinds {
        if indicators.exclude.iter().any(|e| e.eq_ignore_ascii_case(kind)) {
            errors.push(format!("indicators: '{kind}' is both requested and excluded"));
        }
    }

    for (kind, params) in &indicators.params {
        let fields = [
            ("length", params.length),
            ("fast", params.fast),
            ("slow", params.slow),
            ("signal", params.signal),
        ];
        for (field, value) in fields {
            if value == Some(0) {
                errors.push(format!("indicators.params.{kind}.{field}: must be positive"));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

fn validate_logging(config: &PipelineConfig, errors: &mut Vec<String>) {
    if config.logging.level.parse::<tracing::Level>().is_err() {
        errors.push(format!("logging.level: unknown level '{}'", config.logging.level));
    }
}
