use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber with sensible defaults.
///
/// Reads the `RUST_LOG` environment variable for filtering. Falls back to
/// `info` when the variable is not set or cannot be parsed.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}
