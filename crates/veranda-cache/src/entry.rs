//! Cache entry with TTL metadata

use bytes::Bytes;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::time::Duration;

/// A single cached value with its expiration metadata.
///
/// Entries are owned exclusively by the backend that stores them: created on
/// `set`, overwritten on re-`set`, removed on expiry or explicit deletion.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored payload
    pub value: Bytes,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Expiration timestamp, None = never expires
    pub expires_at: Option<DateTime<Utc>>,
}

impl CacheEntry {
    /// Create a new entry with an optional TTL.
    pub fn new(value: Bytes, ttl: Option<Duration>) -> Self {
        let now = Utc::now();
        let expires_at = ttl
            .and_then(|d| ChronoDuration::from_std(d).ok())
            .map(|d| now + d);

        Self {
            value,
            created_at: now,
            expires_at,
        }
    }

    /// Check whether the entry has expired.
    ///
    /// An entry is expired once the current time has reached `expires_at`.
    /// Reads must treat expired entries as absent even while they are still
    /// physically resident (lazy expiry); the periodic sweep reclaims them.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires) => Utc::now() >= expires,
            None => false,
        }
    }

    /// Remaining lifetime in whole seconds, or None when the entry never
    /// expires. Expired entries report 0.
    pub fn remaining_secs(&self) -> Option<i64> {
        self.expires_at.map(|expires| {
            let remaining = (expires - Utc::now()).num_seconds();
            remaining.max(0)
        })
    }

    /// Replace the expiration without touching the value.
    pub fn reset_ttl(&mut self, ttl: Duration) {
        self.expires_at = ChronoDuration::from_std(ttl)
            .ok()
            .map(|d| Utc::now() + d);
    }
}
