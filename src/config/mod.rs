pub mod types;
pub mod validate;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

/// Load a [`PipelineConfig`] from a JSON file, then apply environment
/// variable overrides and validate.
///
/// Every section is optional; missing sections take their defaults, so an
/// empty object `{}` yields the default bucket table.
///
/// # Environment variable overrides
///
/// | Env Var                            | Config Field                        |
/// |------------------------------------|-------------------------------------|
/// | `TA_FEATURES_DROP_INCOMPLETE_ROWS` | `indicators.drop_incomplete_rows`   |
/// | `TA_FEATURES_EXCLUDE`              | `indicators.exclude` (comma list)   |
/// | `TA_FEATURES_LOG_LEVEL`            | `logging.level`                     |
pub fn load_config(path: &Path) -> Result<PipelineConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let mut config: PipelineConfig = serde_json::from_str(&contents)
        .with_context(|| format!("parsing {}", path.display()))?;

    apply_env_overrides(&mut config);
    validate::validate_config(&config)?;

    Ok(config)
}

/// Default configuration with environment overrides applied, for runs
/// without a config file.
pub fn default_config() -> Result<PipelineConfig> {
    let mut config = PipelineConfig::default();
    apply_env_overrides(&mut config);
    validate::validate_config(&config)?;
    Ok(config)
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides to the loaded config.
///
/// Only non-empty env vars take effect.
fn apply_env_overrides(config: &mut PipelineConfig) {
    if let Some(val) = env_bool("TA_FEATURES_DROP_INCOMPLETE_ROWS") {
        info!(drop_incomplete_rows = val, "env override: TA_FEATURES_DROP_INCOMPLETE_ROWS");
        config.indicators.drop_incomplete_rows = val;
    }

    if let Some(val) = env_string("TA_FEATURES_EXCLUDE") {
        let kinds: Vec<String> = val
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect();
        info!(?kinds, "env override: TA_FEATURES_EXCLUDE");
        config.indicators.exclude.extend(kinds);
    }

    if let Some(val) = env_string("TA_FEATURES_LOG_LEVEL") {
        info!(%val, "env override: TA_FEATURES_LOG_LEVEL");
        config.logging.level = val;
    }
}

/// Read a non-empty env var as a `String`.
fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Read a non-empty env var as a bool (`true`, `1`, `yes` → true).
fn env_bool(key: &str) -> Option<bool> {
    env_string(key).map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const ENV_KEYS: [&str; 3] = [
        "TA_FEATURES_DROP_INCOMPLETE_ROWS",
        "TA_FEATURES_EXCLUDE",
        "TA_FEATURES_LOG_LEVEL",
    ];

    fn clear_env() {
        for key in ENV_KEYS {
            // SAFETY: env-touching tests are #[serial]
            unsafe { std::env::remove_var(key) };
        }
    }

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), contents).unwrap();
        file
    }

    #[test]
    #[serial]
    fn test_empty_object_yields_defaults() {
        clear_env();
        let file = write_config("{}");
        let config = load_config(file.path()).unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    #[serial]
    fn test_load_custom_buckets() {
        clear_env();
        let file = write_config(
            r#"{
                "ranges": {
                    "buckets": [
                        { "name": "prices", "dynamic": true, "reference_column": "close", "claim_reference": false },
                        { "name": "-100_100", "prefixes": ["ROC"], "dynamic": true, "normalize": true,
                          "bounds": { "min": -100.0, "max": 100.0, "tolerance": 0.0001 } }
                    ]
                },
                "indicators": { "kinds": ["ROC", "SMA"], "params": { "ROC": { "length": 5 } } }
            }"#,
        );

        let config = load_config(file.path()).unwrap();
        let buckets = &config.ranges.buckets;
        assert_eq!(buckets.len(), 2);
        assert!(!buckets[0].claim_reference);
        assert_eq!(buckets[1].prefixes, vec!["ROC".to_string()]);
        assert!(buckets[1].normalize);
        assert_eq!(config.indicators.params["ROC"].length, Some(5));
        assert!(config.indicators.drop_incomplete_rows);
    }

    #[test]
    #[serial]
    fn test_shipped_config_matches_defaults() {
        clear_env();
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/ta-features.json");
        let config = load_config(&path).unwrap();

        assert_eq!(config.ranges, RangeConfig::default());
        assert_eq!(config.indicators.params["MACD"].signal, Some(9));
    }

    #[test]
    #[serial]
    fn test_invalid_config_rejected() {
        clear_env();
        let file = write_config(r#"{ "ranges": { "buckets": [ { "name": "x", "dynamic": true } ] } }"#);
        let err = load_config(file.path()).unwrap_err().to_string();
        assert!(err.contains("needs bounds"), "{err}");
    }

    #[test]
    #[serial]
    fn test_unknown_bucket_field_rejected() {
        clear_env();
        let file = write_config(r#"{ "ranges": { "buckets": [ { "name": "x", "cols": [] } ] } }"#);
        let err = format!("{:#}", load_config(file.path()).unwrap_err());
        assert!(err.contains("parsing"), "{err}");
    }

    #[test]
    #[serial]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/ta-features.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        // SAFETY: env-touching tests are #[serial]
        unsafe {
            std::env::set_var("TA_FEATURES_DROP_INCOMPLETE_ROWS", "false");
            std::env::set_var("TA_FEATURES_EXCLUDE", "kama, natr,");
            std::env::set_var("TA_FEATURES_LOG_LEVEL", "debug");
        }

        let config = default_config().unwrap();
        clear_env();

        assert!(!config.indicators.drop_incomplete_rows);
        assert_eq!(config.indicators.exclude, vec!["kama".to_string(), "natr".to_string()]);
        assert_eq!(config.logging.level, "debug");
    }
}
