//! Logging configuration.
//!
//! Process-wide tracing initialization with an explicit startup lifecycle:
//! the binary calls this once before constructing any component.

use tracing_subscriber::EnvFilter;

/// Initializes logging to stderr.
///
/// The filter honors `RUST_LOG` and defaults to `info`.
pub fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
