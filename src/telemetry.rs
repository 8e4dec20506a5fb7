//! Tracing initialization for binaries and tests embedding this crate.

use tracing_subscriber::EnvFilter;

/// Initialize a stderr tracing subscriber.
///
/// The filter is taken from `RUST_LOG` when set, defaulting to `info`.
/// Safe to call more than once; repeated calls are no-ops so test binaries
/// can initialize unconditionally.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_target(true)
        .try_init();
}
