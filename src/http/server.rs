//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with every gateway route
//! - Wire up middleware (request ID, tracing, request timeout, panic capture)
//! - Own the player cache and start its sweeper
//! - Bind server to listener and stop on the shutdown broadcast

use axum::{http::StatusCode, middleware, routing::get, Router};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::cache::PlayerCache;
use crate::config::GatewayConfig;
use crate::gateway::PlayerService;
use crate::health;
use crate::http::handlers;
use crate::http::request::{make_span, UuidRequestId};
use crate::upstream::{Providers, UpstreamClient, UpstreamError};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub players: PlayerService,
    pub started_at: Instant,
}

/// Errors raised while assembling the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("upstream setup failed: {0}")]
    Upstream(#[from] UpstreamError),
}

/// HTTP server for the gateway.
pub struct GatewayServer {
    router: Router,
    config: GatewayConfig,
    cache: PlayerCache,
}

impl GatewayServer {
    /// Create a new server with a cache sized from the configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, ServerError> {
        let cache = PlayerCache::new(Duration::from_secs(config.cache.ttl_secs));
        Self::with_cache(config, cache)
    }

    /// Create a new server around an existing cache.
    pub fn with_cache(config: GatewayConfig, cache: PlayerCache) -> Result<Self, ServerError> {
        Self::assemble(config, cache, Instant::now())
    }

    /// Create a new server whose `/health` uptime counts from `started_at`,
    /// normally the moment the process started.
    pub fn started_at(config: GatewayConfig, started_at: Instant) -> Result<Self, ServerError> {
        let cache = PlayerCache::new(Duration::from_secs(config.cache.ttl_secs));
        Self::assemble(config, cache, started_at)
    }

    fn assemble(
        config: GatewayConfig,
        cache: PlayerCache,
        started_at: Instant,
    ) -> Result<Self, ServerError> {
        let providers = Providers::from_config(&config.providers)?;
        let client = UpstreamClient::new()?;
        let players = PlayerService::new(cache.clone(), client, providers, &config.valorant);

        let state = AppState {
            players,
            started_at,
        };

        let router = Self::build_router(&config, state);
        Ok(Self {
            router,
            config,
            cache,
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/api/player/{uid}/{tag}", get(handlers::brawl_stars))
            .route("/api/brawl/{uid}/{tag}", get(handlers::brawl_stars))
            .route("/api/clash/{uid}/{tag}", get(handlers::clash_royale))
            .route("/api/clashofclans/{uid}/{tag}", get(handlers::clash_of_clans))
            .route("/api/lol/{uid}/{summoner_name}", get(handlers::league_of_legends))
            .route("/api/valorant/{uid}/{riot_id}", get(handlers::valorant_account))
            .route("/api/valorant/rank/{uid}/{puuid}", get(handlers::valorant_rank))
            .route("/api/fortnite/{uid}/{username}", get(handlers::fortnite))
            .route("/health", get(health::health_check))
            .route("/my-ip", get(handlers::my_ip))
            .fallback(handlers::not_found)
            .with_state(state)
            .layer(CatchPanicLayer::custom(handlers::panic_response))
            .layer(TimeoutLayer::with_status_code(
                StatusCode::GATEWAY_TIMEOUT,
                Duration::from_secs(config.timeouts.request_secs),
            ))
            .layer(middleware::map_response(handlers::timeout_envelope))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(make_span))
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
    }

    /// The fully layered router, for serving on a custom listener or
    /// driving in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener until the
    /// shutdown broadcast fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            cache_ttl_secs = self.config.cache.ttl_secs,
            "HTTP server starting"
        );

        let sweep_interval = Duration::from_secs(self.config.cache.sweep_interval_secs);
        tokio::spawn(self.cache.clone().run_sweeper(sweep_interval, shutdown.resubscribe()));

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn cache(&self) -> &PlayerCache {
        &self.cache
    }
}
