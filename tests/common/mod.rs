//! Shared utilities for integration and load testing.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use game_gateway::cache::PlayerCache;
use game_gateway::config::{GatewayConfig, ProviderConfig};
use game_gateway::{GatewayServer, Shutdown};
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// A request as seen by the mock upstream.
#[derive(Debug, Clone)]
pub struct MockRequest {
    /// Path and query, still percent-encoded.
    pub target: String,
    pub headers: Vec<(String, String)>,
}

impl MockRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Handle to a running mock upstream.
#[derive(Clone)]
pub struct MockUpstream {
    pub addr: SocketAddr,
    calls: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<MockRequest>>>,
}

impl MockUpstream {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<MockRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn base(&self, prefix: &str) -> String {
        format!("http://{}{}", self.addr, prefix)
    }
}

/// Start a programmable mock upstream on an ephemeral port.
///
/// The handler receives each parsed request and returns the status and
/// body to answer with; it may sleep to simulate a slow upstream.
pub async fn start_mock_upstream<F, Fut>(handler: F) -> MockUpstream
where
    F: Fn(MockRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handler = Arc::new(handler);
    let calls = Arc::new(AtomicUsize::new(0));
    let requests = Arc::new(Mutex::new(Vec::new()));

    let mock = MockUpstream {
        addr,
        calls: calls.clone(),
        requests: requests.clone(),
    };

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let handler = handler.clone();
            let calls = calls.clone();
            let requests = requests.clone();
            tokio::spawn(async move {
                let Some(request) = read_request(&mut socket).await else {
                    return;
                };
                calls.fetch_add(1, Ordering::SeqCst);
                requests.lock().unwrap().push(request.clone());

                let (status, body) = handler(request).await;
                let reason = StatusCode::from_u16(status)
                    .ok()
                    .and_then(|s| s.canonical_reason())
                    .unwrap_or("Unknown");
                let response = format!(
                    "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    reason,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    mock
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> Option<MockRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if buf.windows(4).any(|w| w == b"\r\n\r\n") || buf.len() > 64 * 1024 {
            break;
        }
    }

    let text = String::from_utf8_lossy(&buf);
    let mut lines = text.split("\r\n");
    let request_line = lines.next()?;
    let target = request_line.split_whitespace().nth(1)?.to_string();
    let headers = lines
        .take_while(|line| !line.is_empty())
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();

    Some(MockRequest { target, headers })
}

/// Gateway config with every provider pointed at `mock`, each under its
/// own path prefix and with its own key.
pub fn config_for(mock: &MockUpstream) -> GatewayConfig {
    let provider = |prefix: &str, key: Option<&str>| ProviderConfig {
        base_url: Some(mock.base(prefix)),
        api_key: key.map(str::to_string),
        timeout_ms: Some(2_000),
    };

    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.providers.brawl_stars = provider("/brawl/v1", Some("brawl-key"));
    config.providers.clash_royale = provider("/clash/v1", Some("clash-key"));
    config.providers.clash_of_clans = provider("/coc/v1", Some("coc-key"));
    config.providers.riot_platform = provider("/platform", Some("riot-key"));
    config.providers.riot_account = provider("/account", Some("riot-key"));
    config.providers.henrik = provider("/henrik", Some("henrik-key"));
    config.providers.fortnite = provider("/fortnite", Some("fn-key"));
    config.providers.ip_echo = provider("/ip", None);
    config
}

/// A gateway served on an ephemeral port; shuts down on drop.
pub struct TestGateway {
    pub addr: SocketAddr,
    shutdown: Shutdown,
    client: reqwest::Client,
}

impl TestGateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// GET `path` and return the status with the decoded JSON body.
    pub async fn get(&self, path: &str) -> (u16, Value) {
        let res = self.client.get(self.url(path)).send().await.expect("Gateway unreachable");
        let status = res.status().as_u16();
        let body = res.json().await.expect("Gateway answered with non-JSON body");
        (status, body)
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

impl Drop for TestGateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub async fn spawn_gateway(config: GatewayConfig) -> TestGateway {
    let server = GatewayServer::new(config).expect("Gateway config should be valid");
    serve(server).await
}

pub async fn spawn_gateway_with_cache(config: GatewayConfig, cache: PlayerCache) -> TestGateway {
    let server = GatewayServer::with_cache(config, cache).expect("Gateway config should be valid");
    serve(server).await
}

async fn serve(server: GatewayServer) -> TestGateway {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    let client = reqwest::Client::builder()
        .no_proxy()
        .build()
        .unwrap();

    TestGateway {
        addr,
        shutdown,
        client,
    }
}
