use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use ta_features::config;
use ta_features::indicators::{Candle, Library};
use ta_features::logging;
use ta_features::pipeline;
use ta_features::table::FeatureTable;

/// Generate TA features from candles, bucket them by value range and
/// normalize the bounded ones.
#[derive(Debug, Parser)]
#[command(name = "ta-features", version)]
struct Cli {
    /// JSON array of candles: objects with open/high/low/close/volume or kline rows.
    candles: PathBuf,

    /// Pipeline configuration (JSON). Defaults to the built-in bucket table.
    #[arg(short, long, env = "TA_FEATURES_CONFIG")]
    config: Option<PathBuf>,

    /// Write the result here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Keep rows that still hold missing values after indicator generation.
    #[arg(long)]
    keep_incomplete_rows: bool,

    /// Indicator kind to skip; repeatable.
    #[arg(short, long = "exclude", value_name = "KIND")]
    exclude: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => config::default_config()?,
    };
    if cli.keep_incomplete_rows {
        config.indicators.drop_incomplete_rows = false;
    }
    config.indicators.exclude.extend(cli.exclude.iter().cloned());

    logging::init_tracing(&config.logging)?;

    let contents = std::fs::read_to_string(&cli.candles)
        .with_context(|| format!("failed to read candles: {}", cli.candles.display()))?;
    let candles: Vec<Candle> = serde_json::from_str(&contents)
        .with_context(|| format!("parsing {}", cli.candles.display()))?;
    info!(candles = candles.len(), "candles loaded");

    let output = pipeline::run(FeatureTable::from_candles(&candles), &Library::new(), &config)
        .context("feature pipeline failed")?;

    let json = serde_json::to_string_pretty(&output).context("serializing output")?;
    match &cli.output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("failed to write output: {}", path.display()))?;
            info!(path = %path.display(), "output written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}").context("writing to stdout")?;
        }
    }

    Ok(())
}
