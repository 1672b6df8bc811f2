use anyhow::Result;
use tracing::debug;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initializes the tracing subscriber for the process.
///
/// Diagnostics go to stderr so stdout stays free for the run summary;
/// verbosity is controlled through `RUST_LOG`.
pub fn init_logger() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    debug!("Logger initialized");

    Ok(())
}
