/// Configures the global subscriber once for the whole process.
///
/// `RUST_LOG` selects the level (default `info`); per-module filters work as
/// usual, e.g. `RUST_LOG=storefront::clients=debug,tower_http=info`.
pub fn setup_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .compact()
        .init();
}
