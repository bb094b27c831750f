//! Configuration validation.
//!
//! Serde handles syntax; this module checks semantics: addresses parse,
//! durations are non-zero, provider overrides resolve to usable URLs.
//! All errors are collected, not just the first.

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::upstream::providers::{Provider, ProviderKind};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),

    #[error("providers.{provider}: {reason}")]
    InvalidProvider { provider: &'static str, reason: String },

    #[error("{field} must not exceed {max}")]
    DurationTooLong { field: &'static str, max: u64 },

    #[error("timeouts.request_secs ({request_secs} s) is shorter than the Valorant account lookup with fallback ({chain_ms} ms)")]
    RequestTimeoutTooShort { request_secs: u64, chain_ms: u64 },

    #[error("valorant.region must not be empty")]
    EmptyRegion,
}

pub const MAX_REQUEST_SECS: u64 = 3_600;
pub const MAX_CACHE_TTL_SECS: u64 = 86_400;
pub const MAX_SWEEP_INTERVAL_SECS: u64 = 86_400;
pub const MAX_PROVIDER_TIMEOUT_MS: u64 = 300_000;

/// Validate a configuration, returning every error found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroDuration("timeouts.request_secs"));
    }
    if config.cache.ttl_secs == 0 {
        errors.push(ValidationError::ZeroDuration("cache.ttl_secs"));
    }
    if config.cache.sweep_interval_secs == 0 {
        errors.push(ValidationError::ZeroDuration("cache.sweep_interval_secs"));
    }

    for (field, value, max) in [
        ("timeouts.request_secs", config.timeouts.request_secs, MAX_REQUEST_SECS),
        ("cache.ttl_secs", config.cache.ttl_secs, MAX_CACHE_TTL_SECS),
        ("cache.sweep_interval_secs", config.cache.sweep_interval_secs, MAX_SWEEP_INTERVAL_SECS),
    ] {
        if value > max {
            errors.push(ValidationError::DurationTooLong { field, max });
        }
    }

    for kind in ProviderKind::ALL {
        let overrides = kind.overrides(&config.providers);
        if overrides.timeout_ms == Some(0) {
            errors.push(ValidationError::InvalidProvider {
                provider: kind.config_key(),
                reason: "timeout_ms must be greater than zero".to_string(),
            });
        }
        if overrides.timeout_ms.is_some_and(|ms| ms > MAX_PROVIDER_TIMEOUT_MS) {
            errors.push(ValidationError::InvalidProvider {
                provider: kind.config_key(),
                reason: format!("timeout_ms must not exceed {}", MAX_PROVIDER_TIMEOUT_MS),
            });
        }
        if let Err(e) = Provider::resolve(kind, overrides) {
            errors.push(ValidationError::InvalidProvider {
                provider: kind.config_key(),
                reason: e.to_string(),
            });
        }
    }

    // The account route may wait on the Riot call and then on HenrikDev.
    let chain_ms = [ProviderKind::RiotAccount, ProviderKind::Henrik]
        .into_iter()
        .map(|kind| provider_timeout_ms(kind, config))
        .fold(0u64, u64::saturating_add);
    if config.timeouts.request_secs.saturating_mul(1_000) < chain_ms {
        errors.push(ValidationError::RequestTimeoutTooShort {
            request_secs: config.timeouts.request_secs,
            chain_ms,
        });
    }

    if config.valorant.region.trim().is_empty() {
        errors.push(ValidationError::EmptyRegion);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn provider_timeout_ms(kind: ProviderKind, config: &GatewayConfig) -> u64 {
    kind.overrides(&config.providers)
        .timeout_ms
        .unwrap_or_else(|| kind.default_timeout().as_millis() as u64)
}

/// Providers that will be called without a credential.
///
/// Not an error: the upstream rejects the call and the rejection is
/// surfaced to the caller.
pub fn missing_credentials(config: &GatewayConfig) -> Vec<ProviderKind> {
    ProviderKind::ALL
        .into_iter()
        .filter(|kind| kind.credential_env().is_some())
        .filter(|kind| {
            kind.overrides(&config.providers)
                .api_key
                .as_deref()
                .map_or(true, str::is_empty)
        })
        .collect()
}
