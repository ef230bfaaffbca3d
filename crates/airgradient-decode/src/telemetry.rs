use anyhow::Result;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the JSON log subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Logs go to stderr
/// so stdout carries only the decoded payload.
pub fn init_logging(log_level: &str) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let fmt_layer = fmt::layer()
        .json()
        .with_span_list(true)
        .with_current_span(true)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
