use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Installs the global subscriber. `EASYCHART_LOG` (then `RUST_LOG`) overrides
/// the level picked from `verbose`.
pub fn init_logging(verbose: bool, no_color: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = std::env::var("EASYCHART_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .map_or_else(
            |_| EnvFilter::new(fallback),
            |value| EnvFilter::try_new(value).unwrap_or_else(|_| EnvFilter::new(fallback)),
        );

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_ansi(!no_color)
        .with_target(false)
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set global default subscriber: {}", err);
    }
}
