//! Diagnostic logging setup.

use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber.
///
/// `RUST_LOG` takes precedence; otherwise only errors are shown, or this
/// crate's debug output with `verbose`.
pub fn init(verbose: bool) {
    let fallback = if verbose { "neongen=debug" } else { "error" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
