// Logging initialization
use tracing_subscriber::{
    EnvFilter, fmt, prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt,
};

/// Installs the global subscriber.
///
/// `verbose` enables debug output; `serving` keeps at least info-level logs for
/// the long-running server, while one-shot commands stay quiet by default.
/// A set `RUST_LOG` replaces these defaults entirely.
pub fn init_logging(verbose: bool, serving: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose, serving)));

    tracing_subscriber::registry()
        .with(fmt::layer().pretty().without_time())
        .with(env_filter)
        .init();
}

fn default_directives(verbose: bool, serving: bool) -> String {
    let level = match (verbose, serving) {
        (true, _) => "debug",
        (false, true) => "info",
        (false, false) => "off",
    };
    format!("off,nbp_rates={level},tower_http={level}")
}
