//! Cache backends for the resolver.
//!
//! The resolver owns key composition; backends only store opaque bytes
//! under string keys. Two backends are provided: Redis for deployments
//! and an LRU in-memory store for tests and single-process use.

pub mod memory;
pub mod redis_cache;

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use fews_common::FewsResult;

/// Shared cache handle injected into the resolver.
///
/// `ttl: None` means the entry persists until the backend's own eviction
/// policy removes it. Get/set are atomic per key; nothing more is
/// guaranteed across keys.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> FewsResult<Option<Bytes>>;

    async fn set(&self, key: &str, value: Bytes, ttl: Option<Duration>) -> FewsResult<()>;
}

pub use memory::{MemoryCache, MemoryCacheStats};
pub use redis_cache::RedisCache;
