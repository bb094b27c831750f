//! Upstream provider catalogue.
//!
//! Every provider has built-in defaults (base URL, timeout, auth scheme and
//! the environment variable holding its credential). Configuration may
//! override the base URL, the timeout and the key.

use reqwest::header::{HeaderName, HeaderValue, AUTHORIZATION};
use std::time::Duration;
use url::Url;

use crate::config::schema::{ProviderConfig, ProvidersConfig};
use crate::upstream::types::{UpstreamError, UpstreamResult};

const RIOT_TOKEN: HeaderName = HeaderName::from_static("x-riot-token");

/// Identifies an upstream API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    BrawlStars,
    ClashRoyale,
    ClashOfClans,
    RiotPlatform,
    RiotAccount,
    Henrik,
    Fortnite,
    IpEcho,
}

/// How the credential is attached to outbound requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// `Authorization: Bearer <key>`
    Bearer,
    /// `X-Riot-Token: <key>`
    RiotToken,
    /// `Authorization: <key>`
    Raw,
    /// No credential.
    None,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 8] = [
        ProviderKind::BrawlStars,
        ProviderKind::ClashRoyale,
        ProviderKind::ClashOfClans,
        ProviderKind::RiotPlatform,
        ProviderKind::RiotAccount,
        ProviderKind::Henrik,
        ProviderKind::Fortnite,
        ProviderKind::IpEcho,
    ];

    /// Human-readable name, used in logs and metric labels.
    pub fn name(self) -> &'static str {
        match self {
            ProviderKind::BrawlStars => "Brawl Stars",
            ProviderKind::ClashRoyale => "Clash Royale",
            ProviderKind::ClashOfClans => "Clash of Clans",
            ProviderKind::RiotPlatform => "Riot platform",
            ProviderKind::RiotAccount => "Riot account",
            ProviderKind::Henrik => "HenrikDev",
            ProviderKind::Fortnite => "Fortnite",
            ProviderKind::IpEcho => "IP echo",
        }
    }

    /// Table name under `[providers]` in the config file.
    pub fn config_key(self) -> &'static str {
        match self {
            ProviderKind::BrawlStars => "brawl_stars",
            ProviderKind::ClashRoyale => "clash_royale",
            ProviderKind::ClashOfClans => "clash_of_clans",
            ProviderKind::RiotPlatform => "riot_platform",
            ProviderKind::RiotAccount => "riot_account",
            ProviderKind::Henrik => "henrik",
            ProviderKind::Fortnite => "fortnite",
            ProviderKind::IpEcho => "ip_echo",
        }
    }

    pub fn default_base_url(self) -> &'static str {
        match self {
            ProviderKind::BrawlStars => "https://api.brawlstars.com/v1",
            ProviderKind::ClashRoyale => "https://api.clashroyale.com/v1",
            ProviderKind::ClashOfClans => "https://api.clashofclans.com/v1",
            ProviderKind::RiotPlatform => "https://euw1.api.riotgames.com",
            ProviderKind::RiotAccount => "https://europe.api.riotgames.com",
            ProviderKind::Henrik => "https://api.henrikdev.xyz",
            ProviderKind::Fortnite => "https://fortnite-api.com",
            ProviderKind::IpEcho => "https://api64.ipify.org",
        }
    }

    pub fn default_timeout(self) -> Duration {
        match self {
            ProviderKind::Henrik => Duration::from_secs(15),
            ProviderKind::IpEcho => Duration::from_secs(5),
            _ => Duration::from_secs(10),
        }
    }

    pub fn auth_scheme(self) -> AuthScheme {
        match self {
            ProviderKind::BrawlStars | ProviderKind::ClashRoyale | ProviderKind::ClashOfClans => {
                AuthScheme::Bearer
            }
            ProviderKind::RiotPlatform | ProviderKind::RiotAccount => AuthScheme::RiotToken,
            ProviderKind::Henrik | ProviderKind::Fortnite => AuthScheme::Raw,
            ProviderKind::IpEcho => AuthScheme::None,
        }
    }

    /// Environment variable that overrides the configured credential.
    pub fn credential_env(self) -> Option<&'static str> {
        match self {
            ProviderKind::BrawlStars => Some("BRAWL_API_KEY"),
            ProviderKind::ClashRoyale => Some("CLASH_API_KEY"),
            ProviderKind::ClashOfClans => Some("COC_API_KEY"),
            ProviderKind::RiotPlatform | ProviderKind::RiotAccount => Some("RIOT_API_KEY"),
            ProviderKind::Henrik => Some("HENRIK_API_KEY"),
            ProviderKind::Fortnite => Some("FORTNITE_API_KEY"),
            ProviderKind::IpEcho => None,
        }
    }

    /// The configured overrides for this provider.
    pub fn overrides(self, config: &ProvidersConfig) -> &ProviderConfig {
        match self {
            ProviderKind::BrawlStars => &config.brawl_stars,
            ProviderKind::ClashRoyale => &config.clash_royale,
            ProviderKind::ClashOfClans => &config.clash_of_clans,
            ProviderKind::RiotPlatform => &config.riot_platform,
            ProviderKind::RiotAccount => &config.riot_account,
            ProviderKind::Henrik => &config.henrik,
            ProviderKind::Fortnite => &config.fortnite,
            ProviderKind::IpEcho => &config.ip_echo,
        }
    }

    pub fn overrides_mut(self, config: &mut ProvidersConfig) -> &mut ProviderConfig {
        match self {
            ProviderKind::BrawlStars => &mut config.brawl_stars,
            ProviderKind::ClashRoyale => &mut config.clash_royale,
            ProviderKind::ClashOfClans => &mut config.clash_of_clans,
            ProviderKind::RiotPlatform => &mut config.riot_platform,
            ProviderKind::RiotAccount => &mut config.riot_account,
            ProviderKind::Henrik => &mut config.henrik,
            ProviderKind::Fortnite => &mut config.fortnite,
            ProviderKind::IpEcho => &mut config.ip_echo,
        }
    }
}

/// A resolved provider: defaults merged with configuration.
#[derive(Debug, Clone)]
pub struct Provider {
    kind: ProviderKind,
    base_url: Url,
    auth: Option<(HeaderName, HeaderValue)>,
    timeout: Duration,
}

impl Provider {
    /// Merge the provider's defaults with its configured overrides.
    pub fn resolve(kind: ProviderKind, config: &ProviderConfig) -> UpstreamResult<Self> {
        let raw_url = config
            .base_url
            .as_deref()
            .unwrap_or_else(|| kind.default_base_url());
        let base_url: Url = raw_url
            .parse()
            .map_err(|_| UpstreamError::InvalidUrl(raw_url.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(UpstreamError::InvalidUrl(raw_url.to_string()));
        }

        let key = config.api_key.as_deref().filter(|k| !k.is_empty());
        let auth = match (kind.auth_scheme(), key) {
            (AuthScheme::None, _) | (_, None) => None,
            (AuthScheme::Bearer, Some(key)) => Some((AUTHORIZATION, format!("Bearer {}", key))),
            (AuthScheme::Raw, Some(key)) => Some((AUTHORIZATION, key.to_string())),
            (AuthScheme::RiotToken, Some(key)) => Some((RIOT_TOKEN, key.to_string())),
        };
        let auth = match auth {
            Some((name, value)) => {
                let mut value = HeaderValue::from_str(&value)
                    .map_err(|_| UpstreamError::InvalidCredential(kind.name()))?;
                value.set_sensitive(true);
                Some((name, value))
            }
            None => None,
        };

        let timeout = config
            .timeout_ms
            .map(Duration::from_millis)
            .unwrap_or_else(|| kind.default_timeout());

        Ok(Self {
            kind,
            base_url,
            auth,
            timeout,
        })
    }

    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Header carrying the credential, if one is configured.
    pub fn auth_header(&self) -> Option<&(HeaderName, HeaderValue)> {
        self.auth.as_ref()
    }

    /// Build an endpoint URL by appending percent-encoded path segments to
    /// the base URL.
    pub fn endpoint<I, S>(&self, segments: I) -> UpstreamResult<Url>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| UpstreamError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

/// All resolved providers, built once at startup.
#[derive(Debug, Clone)]
pub struct Providers {
    pub brawl_stars: Provider,
    pub clash_royale: Provider,
    pub clash_of_clans: Provider,
    pub riot_platform: Provider,
    pub riot_account: Provider,
    pub henrik: Provider,
    pub fortnite: Provider,
    pub ip_echo: Provider,
}

impl Providers {
    pub fn from_config(config: &ProvidersConfig) -> UpstreamResult<Self> {
        let resolve = |kind: ProviderKind| Provider::resolve(kind, kind.overrides(config));
        Ok(Self {
            brawl_stars: resolve(ProviderKind::BrawlStars)?,
            clash_royale: resolve(ProviderKind::ClashRoyale)?,
            clash_of_clans: resolve(ProviderKind::ClashOfClans)?,
            riot_platform: resolve(ProviderKind::RiotPlatform)?,
            riot_account: resolve(ProviderKind::RiotAccount)?,
            henrik: resolve(ProviderKind::Henrik)?,
            fortnite: resolve(ProviderKind::Fortnite)?,
            ip_echo: resolve(ProviderKind::IpEcho)?,
        })
    }

    pub fn get(&self, kind: ProviderKind) -> &Provider {
        match kind {
            ProviderKind::BrawlStars => &self.brawl_stars,
            ProviderKind::ClashRoyale => &self.clash_royale,
            ProviderKind::ClashOfClans => &self.clash_of_clans,
            ProviderKind::RiotPlatform => &self.riot_platform,
            ProviderKind::RiotAccount => &self.riot_account,
            ProviderKind::Henrik => &self.henrik,
            ProviderKind::Fortnite => &self.fortnite,
            ProviderKind::IpEcho => &self.ip_echo,
        }
    }
}
