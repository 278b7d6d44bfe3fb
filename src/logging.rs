use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Initialise the global tracing subscriber on stderr.
///
/// `RUST_LOG` wins over the configured level when set. Stdout is left to the
/// command's JSON output.
pub fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ta_features={},warn", logging.level)));

    let registry = tracing_subscriber::registry().with(env_filter);

    if logging.json {
        registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false)
                    .json(),
            )
            .try_init()
            .context("failed to install tracing subscriber")?;
    } else {
        registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .compact(),
            )
            .try_init()
            .context("failed to install tracing subscriber")?;
    }

    Ok(())
}
