//! Route handlers.
//!
//! Handlers stay thin: extract `(uid, identifier)`, run the lookup on the
//! player service and wrap the outcome in an [`Envelope`].

use axum::{
    extract::{Path, State},
    http::{header::CONTENT_TYPE, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;

use crate::gateway::{Game, GatewayError, Lookup};
use crate::http::response::Envelope;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::upstream::UpstreamError;

pub async fn brawl_stars(
    State(state): State<AppState>,
    Path((uid, tag)): Path<(String, String)>,
) -> Response {
    let result = state.players.brawl_stars(&tag).await;
    respond(Game::BrawlStars, uid, &tag, result)
}

pub async fn clash_royale(
    State(state): State<AppState>,
    Path((uid, tag)): Path<(String, String)>,
) -> Response {
    let result = state.players.clash_royale(&tag).await;
    respond(Game::ClashRoyale, uid, &tag, result)
}

pub async fn clash_of_clans(
    State(state): State<AppState>,
    Path((uid, tag)): Path<(String, String)>,
) -> Response {
    let result = state.players.clash_of_clans(&tag).await;
    respond(Game::ClashOfClans, uid, &tag, result)
}

pub async fn league_of_legends(
    State(state): State<AppState>,
    Path((uid, summoner_name)): Path<(String, String)>,
) -> Response {
    let result = state.players.league_of_legends(&summoner_name).await;
    respond(Game::LeagueOfLegends, uid, &summoner_name, result)
}

pub async fn valorant_account(
    State(state): State<AppState>,
    Path((uid, riot_id)): Path<(String, String)>,
) -> Response {
    let result = state.players.valorant_account(&riot_id).await;
    respond(Game::Valorant, uid, &riot_id, result)
}

pub async fn valorant_rank(
    State(state): State<AppState>,
    Path((uid, puuid)): Path<(String, String)>,
) -> Response {
    let result = state.players.valorant_rank(&puuid).await;
    respond(Game::Valorant, uid, &puuid, result)
}

pub async fn fortnite(
    State(state): State<AppState>,
    Path((uid, username)): Path<(String, String)>,
) -> Response {
    let result = state.players.fortnite(&username).await;
    respond(Game::Fortnite, uid, &username, result)
}

fn respond(game: Game, uid: String, id: &str, result: Result<Lookup, GatewayError>) -> Response {
    match result {
        Ok(lookup) => {
            let outcome = if lookup.cached { "cache_hit" } else { "upstream" };
            tracing::info!(uid = %uid, game = game.name(), id, cached = lookup.cached, "Lookup served");
            metrics::record_lookup(game.name(), outcome);
            Envelope::success(uid, lookup).into_response_with(StatusCode::OK)
        }
        Err(err) => {
            let status = err.status();
            match &err {
                GatewayError::Validation(_) => {
                    tracing::info!(uid = %uid, game = game.name(), id, error = %err, "Lookup rejected")
                }
                _ => tracing::warn!(
                    uid = %uid,
                    game = game.name(),
                    id,
                    status = status.as_u16(),
                    error = %err,
                    "Lookup failed"
                ),
            }
            metrics::record_lookup(game.name(), err.outcome());
            Envelope::failure(Some(uid), &err).into_response_with(status)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicIp {
    pub ip: String,
    pub success: bool,
}

/// Public address of this gateway as seen by the IP echo service.
pub async fn my_ip(State(state): State<AppState>) -> Response {
    match fetch_public_ip(&state).await {
        Ok(ip) => {
            let body = PublicIp { ip, success: true };
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Public IP lookup failed");
            Envelope::message("Unable to fetch public IP")
                .into_response_with(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

async fn fetch_public_ip(state: &AppState) -> Result<String, UpstreamError> {
    let provider = &state.players.providers().ip_echo;
    let mut url = provider.base_url().clone();
    url.query_pairs_mut().append_pair("format", "json");

    let body = state.players.client().get_json(provider, url).await?;
    body.get("ip")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| UpstreamError::Decode("IP echo payload has no ip".to_string()))
}

/// Fallback for unmatched routes.
pub async fn not_found(method: Method, uri: Uri) -> Response {
    tracing::debug!(method = %method, uri = %uri, "No route matched");
    GatewayError::NotFoundRoute {
        method: method.to_string(),
        uri: uri.to_string(),
    }
    .into_response()
}

/// Gives the bare response of the request timeout layer the JSON envelope.
///
/// Handlers always set a content type, so a 504 without one can only come
/// from the timeout layer.
pub async fn timeout_envelope(response: Response) -> Response {
    if response.status() == StatusCode::GATEWAY_TIMEOUT
        && !response.headers().contains_key(CONTENT_TYPE)
    {
        tracing::warn!("Request exceeded the inbound timeout");
        return Envelope::message("Request timed out")
            .into_response_with(StatusCode::GATEWAY_TIMEOUT);
    }
    response
}

/// Converts a handler panic into the catch-all 500 envelope.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = detail, "Handler panicked");
    GatewayError::Unhandled.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_panic_response_is_500_envelope() {
        let response = panic_response(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let envelope: Envelope = serde_json::from_slice(&body).unwrap();
        assert!(!envelope.success);
        assert_eq!(envelope.error.as_deref(), Some("Internal server error"));
    }

    #[tokio::test]
    async fn test_bare_timeout_gets_envelope() {
        let bare = StatusCode::GATEWAY_TIMEOUT.into_response();
        let response = timeout_envelope(bare).await;
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);

        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let envelope: Envelope = serde_json::from_slice(&body).unwrap();
        assert_eq!(envelope.error.as_deref(), Some("Request timed out"));
    }

    #[tokio::test]
    async fn test_upstream_504_envelope_untouched() {
        let upstream = Envelope::message("Fortnite error: 504")
            .into_response_with(StatusCode::GATEWAY_TIMEOUT);
        let response = timeout_envelope(upstream).await;

        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let envelope: Envelope = serde_json::from_slice(&body).unwrap();
        assert_eq!(envelope.error.as_deref(), Some("Fortnite error: 504"));
    }
}
