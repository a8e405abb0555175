use tracing_subscriber::EnvFilter;

/// Installs the global `tracing` subscriber.
///
/// `RUST_LOG` is honoured; without it the crate logs at `info`, or `debug`
/// when `verbose` is set.
pub fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "demand_prep=debug"
    } else {
        "demand_prep=info"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
