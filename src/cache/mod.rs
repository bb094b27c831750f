//! Player payload cache.
//!
//! A shared, process-local map from `"{namespace}-{id}"` to the last
//! successful upstream payload. Entries expire a fixed TTL after the write
//! and are then treated as absent. Nothing is persisted.

use dashmap::DashMap;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::observability::metrics;

/// Expiry used when `now + ttl` does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Cache key, rendered as `"{namespace}-{id}"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(namespace: &str, id: &str) -> Self {
        Self(format!("{}-{}", namespace, id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    data: Value,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// A thread-safe TTL cache for upstream payloads.
///
/// Cloning is cheap and shares the underlying map.
#[derive(Debug, Clone)]
pub struct PlayerCache {
    inner: Arc<DashMap<CacheKey, CacheEntry>>,
    ttl: Duration,
}

impl PlayerCache {
    /// Create an empty cache whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Get the payload stored under `key` if it has not expired.
    ///
    /// An expired entry is removed on the way out.
    pub fn get(&self, key: &CacheKey) -> Option<Value> {
        let now = Instant::now();
        if let Some(entry) = self.inner.get(key) {
            if entry.is_live(now) {
                return Some(entry.data.clone());
            }
        }
        // Only drop the entry if it is still expired; a concurrent insert
        // may have refreshed it in between.
        if self.inner.remove_if(key, |_, e| !e.is_live(now)).is_some() {
            metrics::record_cache_size(self.inner.len());
        }
        None
    }

    /// Store `data` under `key`, replacing any previous entry and restarting
    /// its TTL.
    pub fn insert(&self, key: CacheKey, data: Value) {
        let now = Instant::now();
        let expires_at = now
            .checked_add(self.ttl)
            .or_else(|| now.checked_add(FAR_FUTURE))
            .unwrap_or(now);
        let entry = CacheEntry { data, expires_at };
        self.inner.insert(key, entry);
        metrics::record_cache_size(self.inner.len());
    }

    /// Number of stored entries, expired ones included until swept.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.inner.len();
        self.inner.retain(|_, entry| entry.is_live(now));
        let removed = before.saturating_sub(self.inner.len());
        if removed > 0 {
            metrics::record_cache_size(self.inner.len());
        }
        removed
    }

    /// Periodically purge expired entries until `shutdown` fires.
    pub async fn run_sweeper(
        self,
        interval: Duration,
        mut shutdown: tokio::sync::broadcast::Receiver<()>,
    ) {
        let mut ticker = tokio::time::interval(interval);
        ticker.tick().await;
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let removed = self.purge_expired();
                    if removed > 0 {
                        tracing::debug!(removed, remaining = self.len(), "Purged expired cache entries");
                    }
                }
                _ = shutdown.recv() => {
                    tracing::debug!("Cache sweeper stopping");
                    break;
                }
            }
        }
    }
}
