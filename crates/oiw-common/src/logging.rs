use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding the tracing filter directive.
pub const LOG_ENV: &str = "OIW_LOG";

fn env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_filter))
}

/// Initialize structured logging for the command-line tool.
/// Set OIW_LOG=debug (or trace, info, warn, error) for verbosity control.
pub fn init_logging(default_filter: &str) {
    fmt()
        .with_env_filter(env_filter(default_filter))
        .with_target(true)
        .with_thread_ids(true)
        .init();
}

/// Initialize logging from inside a host process.
///
/// The driver library lives in somebody else's process: output goes to
/// stderr and an already-installed subscriber is left in place.
pub fn init_library_logging(default_filter: &str) {
    let _ = fmt()
        .with_env_filter(env_filter(default_filter))
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}
