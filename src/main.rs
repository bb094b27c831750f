//! Game player gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ───────────────▶ http::server ──▶ http::handlers ──▶ gateway::service
//!                       (request id,     (uid, identifier)    │
//!                        trace, timeout)                      ├─▶ identifier (validate)
//!                                                             ├─▶ cache (hit → cached:true)
//!                                                             └─▶ upstream::client ──▶ Game API
//!     Client Response                                              (auth header,
//!     ◀─────────────── http::response (envelope) ◀──────────────   per-provider timeout)
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;
use tokio::net::TcpListener;

use game_gateway::config::{load_config, validation::missing_credentials};
use game_gateway::lifecycle::{signals, Shutdown};
use game_gateway::observability::{logging, metrics};
use game_gateway::GatewayServer;

#[derive(Parser)]
#[command(name = "game-gateway", version, about = "Player lookup gateway for online games")]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let started_at = Instant::now();
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;
    logging::init(&config.observability.log_level);

    tracing::info!("game-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        cache_ttl_secs = config.cache.ttl_secs,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );
    for provider in missing_credentials(&config) {
        let var = provider.credential_env().unwrap_or_default();
        tracing::warn!(
            provider = provider.name(),
            env = var,
            "No credential configured; upstream calls will be unauthenticated"
        );
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        "Listening for connections; health check at /health"
    );

    let shutdown = Shutdown::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        trigger.trigger();
    });

    let server = GatewayServer::started_at(config, started_at)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
