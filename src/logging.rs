//! Logging setup
//!
//! Logs go to stderr so the report on stdout stays clean. `RUST_LOG` wins
//! over the verbosity-derived level.

use tracing_subscriber::EnvFilter;

use crate::cli::Verbosity;

/// Build the log filter for a verbosity level
pub fn filter_for(verbosity: Verbosity) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(verbosity.log_filter()))
}

/// Install the global subscriber; later calls are ignored
pub fn init(verbosity: Verbosity) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter_for(verbosity))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
