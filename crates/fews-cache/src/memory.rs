//! In-memory cache store.
//!
//! LRU-bounded with lazy TTL expiration on read. Intended for tests and
//! single-process deployments where Redis is overkill.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::Bytes;
use lru::LruCache;
use tokio::sync::Mutex;
use tracing::trace;

use fews_common::FewsResult;

use crate::CacheStore;

const DEFAULT_CAPACITY: usize = 4096;

struct Entry {
    data: Bytes,
    inserted_at: Instant,
    ttl: Option<Duration>,
}

impl Entry {
    fn is_expired(&self) -> bool {
        match self.ttl {
            Some(ttl) => self.inserted_at.elapsed() > ttl,
            None => false,
        }
    }
}

/// Counters for cache behavior, updated with relaxed atomics.
#[derive(Default)]
pub struct MemoryCacheStats {
    pub hits: AtomicU64,
    pub misses: AtomicU64,
    pub expired: AtomicU64,
    pub evictions: AtomicU64,
}

impl MemoryCacheStats {
    /// Hit rate as a percentage (0-100); 0 when nothing was looked up.
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        if total == 0 {
            return 0.0;
        }
        hits as f64 / total as f64 * 100.0
    }
}

/// Bounded in-memory cache store.
pub struct MemoryCache {
    entries: Mutex<LruCache<String, Entry>>,
    stats: MemoryCacheStats,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            stats: MemoryCacheStats::default(),
        }
    }

    pub fn stats(&self) -> &MemoryCacheStats {
        &self.stats
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> FewsResult<Option<Bytes>> {
        let mut entries = self.entries.lock().await;

        if let Some(entry) = entries.get(key) {
            if entry.is_expired() {
                entries.pop(key);
                self.stats.expired.fetch_add(1, Ordering::Relaxed);
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                trace!(key, "cache entry expired");
                return Ok(None);
            }
            self.stats.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(Some(entry.data.clone()));
        }

        self.stats.misses.fetch_add(1, Ordering::Relaxed);
        Ok(None)
    }

    async fn set(&self, key: &str, value: Bytes, ttl: Option<Duration>) -> FewsResult<()> {
        let mut entries = self.entries.lock().await;
        let displaced = entries.push(
            key.to_string(),
            Entry {
                data: value,
                inserted_at: Instant::now(),
                ttl,
            },
        );
        // push returns the replaced value for the same key; only a
        // different key means the LRU entry got pushed out.
        if let Some((displaced_key, _)) = displaced {
            if displaced_key != key {
                self.stats.evictions.fetch_add(1, Ordering::Relaxed);
            }
        }
        Ok(())
    }
}
