//! Tracing setup for embedding binaries

use tracing_subscriber::EnvFilter;

/// Initialize a formatted tracing subscriber.
///
/// The filter comes from `RUST_LOG` when set, falling back to
/// `default_filter` (e.g. `"hopvec=info"`). Calling this more than once is
/// harmless; later calls are ignored.
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
