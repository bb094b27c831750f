//! Upstream game API subsystem.
//!
//! # Data Flow
//! ```text
//! GatewayConfig.providers
//!     → providers.rs (defaults merged with overrides, credentials as headers)
//!     → client.rs (one GET per call, bounded by the provider timeout)
//!     → types.rs (UpstreamError: status, timeout, transport, decode)
//! ```

pub mod client;
pub mod providers;
pub mod types;

pub use client::UpstreamClient;
pub use providers::{AuthScheme, Provider, ProviderKind, Providers};
pub use types::{UpstreamError, UpstreamResult};
