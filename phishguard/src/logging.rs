use tracing_subscriber::EnvFilter;

/// Default directives when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "info,phishguard=debug";

/// Initialize structured logging to stderr, leaving stdout for command output.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging(quiet: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if quiet {
            EnvFilter::new("warn")
        } else {
            EnvFilter::new(DEFAULT_FILTER)
        }
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}
