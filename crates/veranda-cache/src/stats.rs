//! Cache statistics

use serde::Serialize;

/// Point-in-time snapshot of cache health and usage counters.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    /// Physically resident entries (expired-but-unswept included)
    pub entry_count: u64,
    /// Facade-level read hits since open
    pub hits: u64,
    /// Facade-level read misses since open
    pub misses: u64,
    /// Backend identifier ("memory", ...)
    pub backend_kind: &'static str,
    /// Whether the backend answered the snapshot query
    pub backend_healthy: bool,
}

impl CacheStats {
    /// Hit rate over all reads so far, 0.0 when nothing has been read.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_rate() {
        let stats = CacheStats {
            entry_count: 0,
            hits: 3,
            misses: 1,
            backend_kind: "memory",
            backend_healthy: true,
        };
        assert!((stats.hit_rate() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hit_rate_no_reads() {
        let stats = CacheStats {
            entry_count: 0,
            hits: 0,
            misses: 0,
            backend_kind: "memory",
            backend_healthy: true,
        };
        assert_eq!(stats.hit_rate(), 0.0);
    }
}
