use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Log to stderr. `RUST_LOG` wins when set; otherwise the level is `warn`.
/// `verbose` always enables `debug`.
pub fn init_logging(verbose: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(rust_log.as_deref(), verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn env_filter(rust_log: Option<&str>, verbose: bool) -> EnvFilter {
    let filter = rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));

    if verbose {
        filter.add_directive(Level::DEBUG.into())
    } else {
        filter
    }
}
