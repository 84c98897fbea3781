use tracing_subscriber::EnvFilter;

/// Install the console subscriber for sweep progress.
///
/// `RUST_LOG` wins when set; otherwise `verbose` adds request-level detail.
pub fn init(verbose: bool) {
    let default_filter = if verbose {
        "info,vintage_sweep=debug"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init();
}
