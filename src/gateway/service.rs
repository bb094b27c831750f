//! Player lookup pipeline.
//!
//! Every lookup runs the same steps:
//!
//! ```text
//! raw identifier
//!     → parse (reject with 400, nothing else happens)
//!     → cache lookup ("{namespace}-{id}", hit returns cached:true)
//!     → upstream call(s), one attempt each
//!     → success: cache write + payload
//!     → failure: classify_upstream_failure
//! ```
//!
//! Concurrent misses for the same key are not coalesced; both requests
//! reach the upstream and the later write wins.

use serde_json::{json, Value};
use std::sync::Arc;

use crate::cache::{CacheKey, PlayerCache};
use crate::config::schema::ValorantConfig;
use crate::gateway::error::{classify_upstream_failure, GatewayError};
use crate::gateway::game::{Game, VALORANT_RANK_NAMESPACE};
use crate::gateway::identifier::{PlayerTag, Puuid, RiotId, SummonerName, Username};
use crate::observability::metrics;
use crate::upstream::{Provider, Providers, UpstreamClient, UpstreamError, UpstreamResult};

/// Outcome of a successful lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct Lookup {
    pub data: Value,
    pub cached: bool,
}

impl Lookup {
    fn hit(data: Value) -> Self {
        Self { data, cached: true }
    }

    fn fresh(data: Value) -> Self {
        Self { data, cached: false }
    }
}

/// Payload returned when a player has no competitive rank.
pub fn unranked_payload() -> Value {
    json!({
        "currenttier": 0,
        "currenttierpatched": "Unranked",
        "ranking_in_tier": 0,
        "mmr_change_to_last_game": 0,
        "elo": 0,
    })
}

/// Resolves player lookups through the cache and the upstream providers.
#[derive(Debug, Clone)]
pub struct PlayerService {
    cache: PlayerCache,
    client: UpstreamClient,
    providers: Arc<Providers>,
    valorant_region: String,
}

impl PlayerService {
    pub fn new(
        cache: PlayerCache,
        client: UpstreamClient,
        providers: Providers,
        valorant: &ValorantConfig,
    ) -> Self {
        Self {
            cache,
            client,
            providers: Arc::new(providers),
            valorant_region: valorant.region.trim().to_lowercase(),
        }
    }

    pub fn cache(&self) -> &PlayerCache {
        &self.cache
    }

    pub fn client(&self) -> &UpstreamClient {
        &self.client
    }

    pub fn providers(&self) -> &Providers {
        &self.providers
    }

    pub async fn brawl_stars(&self, raw_tag: &str) -> Result<Lookup, GatewayError> {
        self.supercell(Game::BrawlStars, &self.providers.brawl_stars, raw_tag)
            .await
    }

    pub async fn clash_royale(&self, raw_tag: &str) -> Result<Lookup, GatewayError> {
        self.supercell(Game::ClashRoyale, &self.providers.clash_royale, raw_tag)
            .await
    }

    pub async fn clash_of_clans(&self, raw_tag: &str) -> Result<Lookup, GatewayError> {
        self.supercell(Game::ClashOfClans, &self.providers.clash_of_clans, raw_tag)
            .await
    }

    /// Summoner profile plus ranked entries, resolved in two calls.
    pub async fn league_of_legends(&self, raw_name: &str) -> Result<Lookup, GatewayError> {
        let name = SummonerName::parse(raw_name)?;
        let game = Game::LeagueOfLegends;
        self.cached(
            game.cache_namespace(),
            game.name(),
            &name.cache_id(),
            self.fetch_summoner(&name),
        )
        .await
    }

    /// Riot account for a Riot ID, falling back once to HenrikDev.
    pub async fn valorant_account(&self, raw_riot_id: &str) -> Result<Lookup, GatewayError> {
        let riot_id = RiotId::parse(raw_riot_id)?;
        let game = Game::Valorant;
        self.cached(
            game.cache_namespace(),
            game.name(),
            &riot_id.cache_id(),
            self.fetch_valorant_account(&riot_id),
        )
        .await
    }

    /// Competitive rank for a PUUID. An unknown player is unranked, not an
    /// error.
    pub async fn valorant_rank(&self, raw_puuid: &str) -> Result<Lookup, GatewayError> {
        let puuid = Puuid::parse(raw_puuid)?;
        let key = CacheKey::new(VALORANT_RANK_NAMESPACE, puuid.as_str());
        if let Some(hit) = self.cache_hit(VALORANT_RANK_NAMESPACE, &key) {
            return Ok(hit);
        }

        let henrik = &self.providers.henrik;
        let url = henrik.endpoint([
            "valorant",
            "v2",
            "by-puuid",
            "mmr",
            self.valorant_region.as_str(),
            puuid.as_str(),
        ]);
        let result = match url {
            Ok(url) => self.client.get_json(henrik, url).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(data) => {
                self.cache.insert(key, data.clone());
                Ok(Lookup::fresh(data))
            }
            Err(UpstreamError::Status { status: 404, .. }) => {
                tracing::info!(puuid = puuid.as_str(), "No rank data, reporting unranked");
                Ok(Lookup::fresh(unranked_payload()))
            }
            Err(e) => Err(classify_upstream_failure(e, Game::Valorant.name())),
        }
    }

    pub async fn fortnite(&self, raw_username: &str) -> Result<Lookup, GatewayError> {
        let username = Username::parse(raw_username)?;
        let game = Game::Fortnite;
        self.cached(
            game.cache_namespace(),
            game.name(),
            &username.cache_id(),
            self.fetch_fortnite(&username),
        )
        .await
    }

    async fn supercell(
        &self,
        game: Game,
        provider: &Provider,
        raw_tag: &str,
    ) -> Result<Lookup, GatewayError> {
        let tag = PlayerTag::parse(raw_tag)?;
        self.cached(
            game.cache_namespace(),
            game.name(),
            tag.as_str(),
            self.fetch_player(provider, &tag),
        )
        .await
    }

    fn cache_hit(&self, namespace: &'static str, key: &CacheKey) -> Option<Lookup> {
        let hit = self.cache.get(key).map(Lookup::hit);
        metrics::record_cache_lookup(namespace, hit.is_some());
        if hit.is_some() {
            tracing::debug!(key = %key, "Cache hit");
        }
        hit
    }

    async fn cached<F>(
        &self,
        namespace: &'static str,
        provider: &'static str,
        id: &str,
        fetch: F,
    ) -> Result<Lookup, GatewayError>
    where
        F: std::future::Future<Output = UpstreamResult<Value>>,
    {
        let key = CacheKey::new(namespace, id);
        if let Some(hit) = self.cache_hit(namespace, &key) {
            return Ok(hit);
        }

        let data = fetch
            .await
            .map_err(|e| classify_upstream_failure(e, provider))?;
        self.cache.insert(key, data.clone());
        Ok(Lookup::fresh(data))
    }

    async fn fetch_player(&self, provider: &Provider, tag: &PlayerTag) -> UpstreamResult<Value> {
        let url = provider.endpoint(["players", tag.with_hash().as_str()])?;
        self.client.get_json(provider, url).await
    }

    async fn fetch_summoner(&self, name: &SummonerName) -> UpstreamResult<Value> {
        let platform = &self.providers.riot_platform;

        let url = platform.endpoint(["lol", "summoner", "v4", "summoners", "by-name", name.as_str()])?;
        let summoner = self.client.get_json(platform, url).await?;
        let summoner_id = summoner
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| UpstreamError::Decode("summoner payload has no id".to_string()))?
            .to_string();

        let url = platform.endpoint(["lol", "league", "v4", "entries", "by-summoner", summoner_id.as_str()])?;
        let ranked = self.client.get_json(platform, url).await?;

        Ok(json!({ "summoner": summoner, "ranked": ranked }))
    }

    async fn fetch_valorant_account(&self, riot_id: &RiotId) -> UpstreamResult<Value> {
        let account = &self.providers.riot_account;
        let url = account.endpoint([
            "riot",
            "account",
            "v1",
            "accounts",
            "by-riot-id",
            riot_id.name(),
            riot_id.tag(),
        ])?;

        match self.client.get_json(account, url).await {
            Ok(data) => Ok(data),
            Err(e) => {
                tracing::warn!(riot_id = %riot_id, error = %e, "Riot account lookup failed, trying HenrikDev");
                let henrik = &self.providers.henrik;
                let url = henrik.endpoint(["valorant", "v1", "account", riot_id.name(), riot_id.tag()])?;
                self.client.get_json(henrik, url).await
            }
        }
    }

    async fn fetch_fortnite(&self, username: &Username) -> UpstreamResult<Value> {
        let fortnite = &self.providers.fortnite;
        let mut url = fortnite.endpoint(["v2", "stats", "br", "v2"])?;
        url.query_pairs_mut().append_pair("name", username.as_str());
        self.client.get_json(fortnite, url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{ProviderConfig, ProvidersConfig};
    use crate::gateway::identifier::IdentifierError;
    use std::time::Duration;

    fn unreachable_service() -> PlayerService {
        // Bind then drop to get a local port nothing listens on.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let unreachable = ProviderConfig {
            base_url: Some(format!("http://127.0.0.1:{}", port)),
            api_key: None,
            timeout_ms: Some(500),
        };
        let providers = ProvidersConfig {
            brawl_stars: unreachable.clone(),
            clash_royale: unreachable.clone(),
            clash_of_clans: unreachable.clone(),
            riot_platform: unreachable.clone(),
            riot_account: unreachable.clone(),
            henrik: unreachable.clone(),
            fortnite: unreachable.clone(),
            ip_echo: unreachable,
        };
        PlayerService::new(
            PlayerCache::new(Duration::from_secs(60)),
            UpstreamClient::new().unwrap(),
            Providers::from_config(&providers).unwrap(),
            &ValorantConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_invalid_tag_never_touches_cache() {
        let service = unreachable_service();
        let err = service.brawl_stars("#A!").await.unwrap_err();
        assert!(matches!(err, GatewayError::Validation(IdentifierError::Tag)));
        assert!(service.cache().is_empty());
    }

    #[tokio::test]
    async fn test_cache_hit_skips_upstream() {
        let service = unreachable_service();
        service
            .cache()
            .insert(CacheKey::new("clash", "ABC123"), json!({"name": "King"}));

        let lookup = service.clash_royale("#abc123").await.unwrap();
        assert!(lookup.cached);
        assert_eq!(lookup.data, json!({"name": "King"}));
    }

    #[tokio::test]
    async fn test_transport_failure_is_classified() {
        let service = unreachable_service();
        let err = service.clash_of_clans("ABC123").await.unwrap_err();
        assert!(matches!(
            err,
            GatewayError::UpstreamTransport {
                provider: "Clash of Clans",
                ..
            }
        ));
        assert!(service.cache().is_empty());
    }

    #[tokio::test]
    async fn test_riot_id_rejected_before_network() {
        let service = unreachable_service();
        let err = service.valorant_account("NoTagHere").await.unwrap_err();
        assert!(matches!(err, GatewayError::Validation(IdentifierError::RiotId)));
    }

    #[tokio::test]
    async fn test_cached_rank_is_served() {
        let service = unreachable_service();
        service
            .cache()
            .insert(CacheKey::new(VALORANT_RANK_NAMESPACE, "abc-123"), json!({"elo": 1200}));

        let lookup = service.valorant_rank("abc-123").await.unwrap();
        assert!(lookup.cached);
        assert_eq!(lookup.data["elo"], 1200);
    }

    #[test]
    fn test_unranked_payload() {
        let payload = unranked_payload();
        assert_eq!(payload["currenttierpatched"], "Unranked");
        assert_eq!(payload["elo"], 0);
    }
}
