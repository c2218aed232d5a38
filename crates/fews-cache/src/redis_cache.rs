//! Redis-backed cache store.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use redis::{aio::MultiplexedConnection, AsyncCommands, Client};

use fews_common::{FewsError, FewsResult};

use crate::CacheStore;

/// Redis cache client.
///
/// Uses a multiplexed connection; cloning the connection per operation is
/// cheap and keeps the store shareable behind `&self`.
pub struct RedisCache {
    conn: MultiplexedConnection,
}

impl RedisCache {
    /// Connect to Redis.
    pub async fn connect(redis_url: &str) -> FewsResult<Self> {
        let client = Client::open(redis_url)
            .map_err(|e| FewsError::CacheError(format!("Redis connection failed: {}", e)))?;

        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| FewsError::CacheError(format!("Redis connection failed: {}", e)))?;

        Ok(Self { conn })
    }
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get(&self, key: &str) -> FewsResult<Option<Bytes>> {
        let mut conn = self.conn.clone();

        let result: Option<Vec<u8>> = conn
            .get(key)
            .await
            .map_err(|e| FewsError::CacheError(format!("Cache get failed: {}", e)))?;

        Ok(result.map(Bytes::from))
    }

    async fn set(&self, key: &str, value: Bytes, ttl: Option<Duration>) -> FewsResult<()> {
        let mut conn = self.conn.clone();

        match ttl {
            Some(ttl) => {
                let _: () = conn
                    .set_ex(key, value.as_ref(), ttl.as_secs())
                    .await
                    .map_err(|e| FewsError::CacheError(format!("Cache set failed: {}", e)))?;
            }
            None => {
                // No expiry: the entry lives until Redis evicts it.
                let _: () = conn
                    .set(key, value.as_ref())
                    .await
                    .map_err(|e| FewsError::CacheError(format!("Cache set failed: {}", e)))?;
            }
        }

        Ok(())
    }
}
