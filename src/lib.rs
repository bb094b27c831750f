//! Player lookup gateway for online games.
//!
//! Proxies player lookups to the Brawl Stars, Clash Royale, Clash of Clans,
//! Riot (League of Legends, Valorant) and Fortnite APIs, wraps every answer
//! in one JSON envelope and caches successful payloads for a short TTL.

pub mod cache;
pub mod config;
pub mod gateway;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod upstream;

pub use config::schema::GatewayConfig;
pub use http::GatewayServer;
pub use lifecycle::Shutdown;
