//! Veranda Cache Facade
//!
//! A uniform key/value cache with per-entry expiration, pattern-based bulk
//! eviction, and health introspection. The default backend is an in-process
//! store; a networked implementation can be substituted behind the
//! [`CacheBackend`] trait without caller changes.

pub mod backend;
pub mod entry;
pub mod error;
pub mod manager;
pub mod memory;
pub mod stats;

pub use backend::CacheBackend;
pub use entry::CacheEntry;
pub use error::CacheError;
pub use manager::{CacheManager, CacheSettings};
pub use memory::MemoryBackend;
pub use stats::CacheStats;
