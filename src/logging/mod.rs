//! Structured logging via the tracing crate.

use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber for the Lambda environment.
///
/// JSON-formatted events to stdout (picked up by CloudWatch), filtered by
/// `RUST_LOG` with an `info` default. Timestamps and ANSI colors are
/// disabled since the log transport adds its own.
pub fn init_subscriber() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .without_time()
        .try_init()?;

    Ok(())
}
