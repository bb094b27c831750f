//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files, and
//! every field has a default so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration for inbound requests.
    pub timeouts: TimeoutConfig,

    /// Player cache settings.
    pub cache: CacheConfig,

    /// Per-provider overrides (base URL, credential, timeout).
    pub providers: ProvidersConfig,

    /// Valorant-specific settings.
    pub valorant: ValorantConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Player cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Lifetime of a cached payload, counted from the write.
    pub ttl_secs: u64,

    /// Interval of the background sweep that drops expired entries.
    pub sweep_interval_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 300,
            sweep_interval_secs: 60,
        }
    }
}

/// Override for a single upstream provider.
///
/// Unset fields fall back to the provider's built-in defaults.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProviderConfig {
    /// Base URL, e.g. "https://api.brawlstars.com/v1".
    pub base_url: Option<String>,

    /// Secret credential sent with every request to this provider.
    pub api_key: Option<String>,

    /// Per-call timeout in milliseconds.
    pub timeout_ms: Option<u64>,
}

/// Overrides for every upstream provider.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProvidersConfig {
    pub brawl_stars: ProviderConfig,
    pub clash_royale: ProviderConfig,
    pub clash_of_clans: ProviderConfig,
    /// Riot platform host, used by League of Legends lookups.
    pub riot_platform: ProviderConfig,
    /// Riot regional host, used by Riot ID account lookups.
    pub riot_account: ProviderConfig,
    /// HenrikDev API, Valorant fallback and rank lookups.
    pub henrik: ProviderConfig,
    pub fortnite: ProviderConfig,
    /// Public IP echo service behind `/my-ip`.
    pub ip_echo: ProviderConfig,
}

/// Valorant configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ValorantConfig {
    /// Region segment for rank lookups (eu, na, ap, kr, latam, br).
    pub region: String,
}

impl Default for ValorantConfig {
    fn default() -> Self {
        Self {
            region: "eu".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: GatewayConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:3000");
        assert_eq!(config.cache.ttl_secs, 300);
        assert_eq!(config.timeouts.request_secs, 30);
        assert_eq!(config.valorant.region, "eu");
        assert!(config.providers.brawl_stars.api_key.is_none());
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn test_partial_provider_table() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [cache]
            ttl_secs = 60

            [providers.henrik]
            api_key = "HDEV-123"
            timeout_ms = 20000
            "#,
        )
        .unwrap();

        assert_eq!(config.cache.ttl_secs, 60);
        assert_eq!(config.cache.sweep_interval_secs, 60);
        assert_eq!(config.providers.henrik.api_key.as_deref(), Some("HDEV-123"));
        assert_eq!(config.providers.henrik.timeout_ms, Some(20000));
        assert!(config.providers.henrik.base_url.is_none());
    }
}
