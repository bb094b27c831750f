//! Structured logging.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence; otherwise the crate logs at `level` and
/// `tower_http` at debug so request spans are visible.
pub fn init(level: &str) {
    let fallback = format!("game_gateway={level},tower_http=debug");
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
