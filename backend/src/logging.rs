use tracing_subscriber::EnvFilter;

/// Install the global subscriber: fmt output filtered by `RUST_LOG`, `info` by default.
///
/// Records from the `log` facade are bridged through `tracing-log`. Calling this
/// more than once is harmless; returns whether this call installed the subscriber.
pub fn init_logging() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok()
}
