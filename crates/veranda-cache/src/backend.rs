//! Cache backend trait

use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;

use crate::error::CacheError;

/// Key/value storage backend with per-entry expiration.
///
/// The in-process [`MemoryBackend`](crate::MemoryBackend) is the default
/// implementation; a networked store can substitute behind the same trait
/// without any caller changes. Implementations must be safe for concurrent
/// reads and writes.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Fetch a live value. Expired or missing keys return None.
    async fn get(&self, key: &str) -> Result<Option<Bytes>, CacheError>;

    /// Store a value, overwriting any prior entry and resetting its expiry.
    /// `ttl` of None means the entry never expires at the backend level;
    /// default TTL policy is applied by the facade before this call.
    async fn set(&self, key: &str, value: Bytes, ttl: Option<Duration>) -> Result<(), CacheError>;

    /// Remove the given keys, returning how many were present.
    async fn del(&self, keys: &[&str]) -> Result<u64, CacheError>;

    /// Remove every key whose string form contains `pattern`, returning the
    /// number removed. Linear scan; acceptable for a bounded, short-lived
    /// key space.
    async fn del_matching(&self, pattern: &str) -> Result<u64, CacheError>;

    /// Increment the integer stored under `key` by `by`, treating absent or
    /// non-numeric values as 0. Returns the new value. The read-increment-
    /// write must be serialized against concurrent writers to the same key.
    async fn incr(&self, key: &str, by: i64) -> Result<i64, CacheError>;

    /// Reset the TTL of an existing live key without touching its value.
    /// Returns false if the key is absent or expired.
    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool, CacheError>;

    /// Remaining lifetime of a live key in whole seconds. None when the key
    /// is absent, expired, or stored without an expiry.
    async fn ttl(&self, key: &str) -> Result<Option<i64>, CacheError>;

    /// Physically remove expired entries, returning how many were reclaimed.
    async fn purge_expired(&self) -> Result<u64, CacheError>;

    /// Remove all entries unconditionally.
    async fn clear(&self) -> Result<u64, CacheError>;

    /// Number of physically resident entries (expired-but-unswept included).
    async fn len(&self) -> Result<u64, CacheError>;

    /// Short identifier for diagnostics ("memory", "redis", ...).
    fn kind(&self) -> &'static str;
}
