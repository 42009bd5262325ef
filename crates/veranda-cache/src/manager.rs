//! Cache facade implementation

use bytes::Bytes;
use parking_lot::Mutex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::backend::CacheBackend;
use crate::stats::CacheStats;

/// Configuration for the cache facade
#[derive(Debug, Clone)]
pub struct CacheSettings {
    /// TTL applied when callers omit one (or pass zero)
    pub default_ttl: Duration,
    /// How often the background sweep reclaims expired entries
    pub sweep_interval: Duration,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            default_ttl: Duration::from_secs(300),
            sweep_interval: Duration::from_secs(60),
        }
    }
}

/// Uniform key/value cache facade with per-entry expiration.
///
/// Every operation is non-throwing: internal backend faults are logged and
/// degrade to a safe default (`None`/`false`/`0`/`-1`), so callers never
/// have to handle cache failures. The facade owns a background sweep task
/// that physically reclaims expired entries; lazy expiry on read keeps the
/// results correct between sweeps.
///
/// Instances are explicitly constructed with [`CacheManager::open`] and torn
/// down with [`CacheManager::close`]; there is no ambient global cache.
pub struct CacheManager {
    backend: Arc<dyn CacheBackend>,
    settings: CacheSettings,
    hits: AtomicU64,
    misses: AtomicU64,
    sweep: Mutex<Option<JoinHandle<()>>>,
}

impl CacheManager {
    /// Open a cache over the given backend and start the sweep task.
    pub fn open(backend: Arc<dyn CacheBackend>, settings: CacheSettings) -> Arc<Self> {
        info!(
            "Opening cache (backend: {}, default_ttl: {:?}, sweep_interval: {:?})",
            backend.kind(),
            settings.default_ttl,
            settings.sweep_interval
        );

        let sweep = spawn_sweep_task(backend.clone(), settings.sweep_interval);

        Arc::new(Self {
            backend,
            settings,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            sweep: Mutex::new(Some(sweep)),
        })
    }

    /// Fetch a value. Absent, deleted, and expired keys all return None.
    pub async fn get(&self, key: &str) -> Option<Bytes> {
        match self.backend.get(key).await {
            Ok(Some(value)) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(value)
            }
            Ok(None) => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
            Err(e) => {
                warn!("Cache get failed for key {:?}: {}", key, e);
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Fetch and deserialize a JSON value stored with [`set_json`].
    ///
    /// [`set_json`]: CacheManager::set_json
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get(key).await?;
        match serde_json::from_slice(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Cache entry for key {:?} failed to decode: {}", key, e);
                None
            }
        }
    }

    /// Store a value. A zero or omitted TTL uses the configured default.
    /// Overwrites any prior entry under the same key, resetting its expiry.
    pub async fn set(&self, key: &str, value: Bytes, ttl: Option<Duration>) -> bool {
        let ttl = self.effective_ttl(ttl);
        match self.backend.set(key, value, Some(ttl)).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Cache set failed for key {:?}: {}", key, e);
                false
            }
        }
    }

    /// Serialize a value as JSON and store it.
    pub async fn set_json<T: Serialize>(&self, key: &str, value: &T, ttl: Option<Duration>) -> bool {
        match serde_json::to_vec(value) {
            Ok(raw) => self.set(key, Bytes::from(raw), ttl).await,
            Err(e) => {
                warn!("Cache set for key {:?} failed to encode: {}", key, e);
                false
            }
        }
    }

    /// Remove the given keys, returning how many were removed.
    pub async fn del(&self, keys: &[&str]) -> u64 {
        match self.backend.del(keys).await {
            Ok(removed) => removed,
            Err(e) => {
                warn!("Cache del failed: {}", e);
                0
            }
        }
    }

    /// Remove every key containing `pattern`, returning how many were
    /// removed. Linear scan over the key space.
    pub async fn del_by_pattern(&self, pattern: &str) -> u64 {
        match self.backend.del_matching(pattern).await {
            Ok(removed) => {
                debug!("Evicted {} entries matching {:?}", removed, pattern);
                removed
            }
            Err(e) => {
                warn!("Cache pattern eviction failed for {:?}: {}", pattern, e);
                0
            }
        }
    }

    /// Whether a live value exists under `key` (expired counts as absent).
    pub async fn has(&self, key: &str) -> bool {
        match self.backend.get(key).await {
            Ok(found) => found.is_some(),
            Err(e) => {
                warn!("Cache has failed for key {:?}: {}", key, e);
                false
            }
        }
    }

    /// Fetch several keys at once. The result is aligned to the input;
    /// absent entries are represented as None, never dropped.
    pub async fn mget(&self, keys: &[&str]) -> Vec<Option<Bytes>> {
        let mut values = Vec::with_capacity(keys.len());
        for key in keys {
            values.push(self.get(key).await);
        }
        values
    }

    /// Store several pairs under one TTL. An empty input is a no-op
    /// returning false.
    pub async fn mset(&self, pairs: &[(&str, Bytes)], ttl: Option<Duration>) -> bool {
        if pairs.is_empty() {
            return false;
        }

        let mut ok = true;
        for (key, value) in pairs {
            ok &= self.set(key, value.clone(), ttl).await;
        }
        ok
    }

    /// Increment the integer under `key` by `by`, treating absent or
    /// non-numeric values as 0. Returns the new value, or 0 on backend
    /// failure.
    pub async fn incr(&self, key: &str, by: i64) -> i64 {
        match self.backend.incr(key, by).await {
            Ok(value) => value,
            Err(e) => {
                warn!("Cache incr failed for key {:?}: {}", key, e);
                0
            }
        }
    }

    /// Reset the TTL of an existing key without touching its value.
    /// Returns false if the key is absent.
    pub async fn expire(&self, key: &str, ttl: Duration) -> bool {
        match self.backend.expire(key, ttl).await {
            Ok(updated) => updated,
            Err(e) => {
                warn!("Cache expire failed for key {:?}: {}", key, e);
                false
            }
        }
    }

    /// Remaining lifetime of `key` in whole seconds, or -1 when the key is
    /// absent or stored without an expiry.
    pub async fn ttl(&self, key: &str) -> i64 {
        match self.backend.ttl(key).await {
            Ok(Some(remaining)) => remaining,
            Ok(None) => -1,
            Err(e) => {
                warn!("Cache ttl failed for key {:?}: {}", key, e);
                -1
            }
        }
    }

    /// Clear all entries unconditionally.
    pub async fn flush(&self) -> bool {
        match self.backend.clear().await {
            Ok(removed) => {
                info!("Flushed {} cache entries", removed);
                true
            }
            Err(e) => {
                warn!("Cache flush failed: {}", e);
                false
            }
        }
    }

    /// Snapshot of entry count, hit/miss counters, and backend health.
    pub async fn stats(&self) -> CacheStats {
        let (entry_count, backend_healthy) = match self.backend.len().await {
            Ok(count) => (count, true),
            Err(e) => {
                warn!("Cache stats query failed: {}", e);
                (0, false)
            }
        };

        CacheStats {
            entry_count,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            backend_kind: self.backend.kind(),
            backend_healthy,
        }
    }

    /// Liveness probe: a real write+read+delete round trip on a private
    /// probe key, rather than trusting previously known-good state.
    pub async fn ping(&self) -> bool {
        let probe_key = format!("__veranda_probe:{}", Uuid::new_v4());
        let probe_value = Bytes::from(Uuid::new_v4().to_string());

        if self
            .backend
            .set(&probe_key, probe_value.clone(), Some(Duration::from_secs(5)))
            .await
            .is_err()
        {
            return false;
        }

        let read_back = match self.backend.get(&probe_key).await {
            Ok(value) => value,
            Err(_) => return false,
        };

        let alive = read_back.as_ref() == Some(&probe_value);
        if self.backend.del(&[probe_key.as_str()]).await.is_err() {
            return false;
        }
        alive
    }

    /// Stop the background sweep task. Safe to call multiple times; all
    /// other operations keep working (with lazy expiry only) afterwards.
    pub fn close(&self) {
        if let Some(handle) = self.sweep.lock().take() {
            handle.abort();
            info!("Cache closed, sweep task stopped");
        }
    }

    fn effective_ttl(&self, ttl: Option<Duration>) -> Duration {
        match ttl {
            Some(d) if d > Duration::ZERO => d,
            _ => self.settings.default_ttl,
        }
    }
}

impl Drop for CacheManager {
    fn drop(&mut self) {
        self.close();
    }
}

/// Spawn the background task that periodically purges expired entries.
fn spawn_sweep_task(backend: Arc<dyn CacheBackend>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);

        // Skip the first tick (which fires immediately)
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match backend.purge_expired().await {
                Ok(0) => {}
                Ok(reclaimed) => debug!("Sweep reclaimed {} expired entries", reclaimed),
                Err(e) => warn!("Sweep failed: {}", e),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;
    use serde::Deserialize;

    fn open_cache() -> Arc<CacheManager> {
        CacheManager::open(Arc::new(MemoryBackend::new()), CacheSettings::default())
    }

    #[tokio::test]
    async fn test_round_trip_and_expiry() {
        let cache = open_cache();

        assert!(
            cache
                .set("k", Bytes::from("v"), Some(Duration::from_millis(150)))
                .await
        );
        assert_eq!(cache.get("k").await, Some(Bytes::from("v")));

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(cache.get("k").await, None);
    }

    #[tokio::test]
    async fn test_zero_ttl_uses_default() {
        let cache = open_cache();
        cache.set("k", Bytes::from("v"), Some(Duration::ZERO)).await;

        let remaining = cache.ttl("k").await;
        assert!(remaining > 0 && remaining <= 300);
    }

    #[tokio::test]
    async fn test_overwrite_resets_expiry() {
        let cache = open_cache();
        cache
            .set("k", Bytes::from("old"), Some(Duration::from_secs(1)))
            .await;
        cache
            .set("k", Bytes::from("new"), Some(Duration::from_secs(120)))
            .await;

        assert_eq!(cache.get("k").await, Some(Bytes::from("new")));
        assert!(cache.ttl("k").await > 1);
    }

    #[tokio::test]
    async fn test_pattern_eviction() {
        let cache = open_cache();
        cache.set("user:1", Bytes::from("a"), None).await;
        cache.set("user:2", Bytes::from("b"), None).await;
        cache.set("order:1", Bytes::from("c"), None).await;

        assert_eq!(cache.del_by_pattern("user:").await, 2);
        assert_eq!(cache.get("order:1").await, Some(Bytes::from("c")));
    }

    #[tokio::test]
    async fn test_has_reflects_liveness() {
        let cache = open_cache();
        assert!(!cache.has("k").await);

        cache
            .set("k", Bytes::from("v"), Some(Duration::from_millis(50)))
            .await;
        assert!(cache.has("k").await);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!cache.has("k").await);
    }

    #[tokio::test]
    async fn test_mget_aligned_to_input() {
        let cache = open_cache();
        cache.set("a", Bytes::from("1"), None).await;
        cache.set("c", Bytes::from("3"), None).await;

        let values = cache.mget(&["a", "b", "c"]).await;
        assert_eq!(
            values,
            vec![Some(Bytes::from("1")), None, Some(Bytes::from("3"))]
        );
    }

    #[tokio::test]
    async fn test_mset_empty_is_noop() {
        let cache = open_cache();
        assert!(!cache.mset(&[], None).await);
        assert_eq!(cache.stats().await.entry_count, 0);
    }

    #[tokio::test]
    async fn test_mset_stores_all_pairs() {
        let cache = open_cache();
        let pairs = [("a", Bytes::from("1")), ("b", Bytes::from("2"))];
        assert!(cache.mset(&pairs, Some(Duration::from_secs(30))).await);

        assert_eq!(cache.get("a").await, Some(Bytes::from("1")));
        assert_eq!(cache.get("b").await, Some(Bytes::from("2")));
    }

    #[tokio::test]
    async fn test_incr() {
        let cache = open_cache();
        assert_eq!(cache.incr("count", 1).await, 1);
        assert_eq!(cache.incr("count", 2).await, 3);
    }

    #[tokio::test]
    async fn test_ttl_minus_one_for_absent() {
        let cache = open_cache();
        assert_eq!(cache.ttl("missing").await, -1);
    }

    #[tokio::test]
    async fn test_expire_absent_key() {
        let cache = open_cache();
        assert!(!cache.expire("missing", Duration::from_secs(10)).await);
    }

    #[tokio::test]
    async fn test_flush() {
        let cache = open_cache();
        cache.set("a", Bytes::from("1"), None).await;
        cache.set("b", Bytes::from("2"), None).await;

        assert!(cache.flush().await);
        assert_eq!(cache.stats().await.entry_count, 0);
    }

    #[tokio::test]
    async fn test_stats_counters() {
        let cache = open_cache();
        cache.set("k", Bytes::from("v"), None).await;

        cache.get("k").await;
        cache.get("missing").await;

        let stats = cache.stats().await;
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entry_count, 1);
        assert_eq!(stats.backend_kind, "memory");
        assert!(stats.backend_healthy);
    }

    #[tokio::test]
    async fn test_ping_leaves_no_residue() {
        let cache = open_cache();
        assert!(cache.ping().await);
        assert_eq!(cache.stats().await.entry_count, 0);
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let cache = open_cache();
        cache.close();
        cache.close();

        // Operations still work after close, with lazy expiry only.
        cache.set("k", Bytes::from("v"), None).await;
        assert_eq!(cache.get("k").await, Some(Bytes::from("v")));
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Payload {
        id: u32,
        name: String,
    }

    #[tokio::test]
    async fn test_json_round_trip() {
        let cache = open_cache();
        let payload = Payload {
            id: 7,
            name: "booking".to_string(),
        };

        assert!(cache.set_json("p", &payload, None).await);
        assert_eq!(cache.get_json::<Payload>("p").await, Some(payload));
    }

    #[tokio::test]
    async fn test_get_json_decode_failure_is_absent() {
        let cache = open_cache();
        cache.set("p", Bytes::from("not json"), None).await;
        assert_eq!(cache.get_json::<Payload>("p").await, None);
    }
}
