// src/cache.rs
//! Time-bounded cache in front of the upstream feeds.
//!
//! Absolute TTL, no sliding refresh: an entry is served until `ttl` has elapsed
//! since it was stored, then the next request refetches. Errors are never stored.

use metrics::{counter, gauge};
use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

impl CacheStatus {
    pub fn as_header(self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
        }
    }
}

struct Entry<V> {
    stored_at: Instant,
    value: Arc<V>,
}

pub struct TtlCache<K, V> {
    name: &'static str,
    ttl: Duration,
    entries: RwLock<HashMap<K, Entry<V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new(name: &'static str, ttl: Duration) -> Self {
        gauge!("cache_ttl_secs", "cache" => name).set(ttl.as_secs_f64());
        Self {
            name,
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh value for `key`, if any.
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        let map = self.entries.read().unwrap_or_else(|p| p.into_inner());
        map.get(key)
            .filter(|e| e.stored_at.elapsed() < self.ttl)
            .map(|e| e.value.clone())
    }

    pub fn insert(&self, key: K, value: V) -> Arc<V> {
        let value = Arc::new(value);
        let mut map = self.entries.write().unwrap_or_else(|p| p.into_inner());
        map.insert(
            key,
            Entry {
                stored_at: Instant::now(),
                value: value.clone(),
            },
        );
        value
    }

    /// Serve from cache, or run `fetch` and store its `Ok` value.
    /// No lock is held while `fetch` runs; concurrent misses may both fetch.
    pub async fn get_or_try_fetch<F, Fut, E>(
        &self,
        key: K,
        fetch: F,
    ) -> Result<(Arc<V>, CacheStatus), E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(v) = self.get(&key) {
            counter!("cache_hits_total", "cache" => self.name).increment(1);
            return Ok((v, CacheStatus::Hit));
        }
        counter!("cache_misses_total", "cache" => self.name).increment(1);
        let fresh = fetch().await?;
        tracing::debug!(target: "cache", cache = self.name, "stored fresh entry");
        Ok((self.insert(key, fresh), CacheStatus::Miss))
    }
}
