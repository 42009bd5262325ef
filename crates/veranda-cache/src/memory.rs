//! In-process cache backend

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::Duration;

use crate::backend::CacheBackend;
use crate::entry::CacheEntry;
use crate::error::CacheError;

/// In-process backend: a `HashMap` behind a coarse read/write lock.
///
/// Expiry is lazy — reads compare against the stored deadline and treat
/// stale entries as absent; physical reclamation happens in `purge_expired`,
/// driven by the facade's sweep task.
#[derive(Default)]
pub struct MemoryBackend {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<Bytes>, CacheError> {
        let entries = self.entries.read();
        Ok(entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.value.clone()))
    }

    async fn set(&self, key: &str, value: Bytes, ttl: Option<Duration>) -> Result<(), CacheError> {
        let mut entries = self.entries.write();
        entries.insert(key.to_string(), CacheEntry::new(value, ttl));
        Ok(())
    }

    async fn del(&self, keys: &[&str]) -> Result<u64, CacheError> {
        let mut entries = self.entries.write();
        let mut removed = 0;
        for key in keys {
            if entries.remove(*key).is_some() {
                removed += 1;
            }
        }
        Ok(removed)
    }

    async fn del_matching(&self, pattern: &str) -> Result<u64, CacheError> {
        let mut entries = self.entries.write();
        let matching: Vec<String> = entries
            .keys()
            .filter(|key| key.contains(pattern))
            .cloned()
            .collect();

        for key in &matching {
            entries.remove(key);
        }
        Ok(matching.len() as u64)
    }

    async fn incr(&self, key: &str, by: i64) -> Result<i64, CacheError> {
        // Single write lock covers the read-increment-write, so concurrent
        // callers cannot lose updates.
        let mut entries = self.entries.write();

        let current = entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .and_then(|entry| std::str::from_utf8(&entry.value).ok())
            .and_then(|s| s.trim().parse::<i64>().ok())
            .unwrap_or(0);

        let next = current + by;
        let expires_at = entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .and_then(|entry| entry.expires_at);

        let mut entry = CacheEntry::new(Bytes::from(next.to_string()), None);
        entry.expires_at = expires_at;
        entries.insert(key.to_string(), entry);

        Ok(next)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool, CacheError> {
        let mut entries = self.entries.write();
        match entries.get_mut(key) {
            Some(entry) if !entry.is_expired() => {
                entry.reset_ttl(ttl);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn ttl(&self, key: &str) -> Result<Option<i64>, CacheError> {
        let entries = self.entries.read();
        Ok(entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .and_then(|entry| entry.remaining_secs()))
    }

    async fn purge_expired(&self) -> Result<u64, CacheError> {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired());
        Ok((before - entries.len()) as u64)
    }

    async fn clear(&self) -> Result<u64, CacheError> {
        let mut entries = self.entries.write();
        let count = entries.len() as u64;
        entries.clear();
        Ok(count)
    }

    async fn len(&self) -> Result<u64, CacheError> {
        Ok(self.entries.read().len() as u64)
    }

    fn kind(&self) -> &'static str {
        "memory"
    }
}
