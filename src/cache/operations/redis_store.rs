use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use redis::{AsyncCommands, Client as RedisClient};

use crate::cache::{CacheError, CacheStore};

/// 基于 Redis 的缓存实现
#[derive(Clone)]
pub struct RedisCacheStore {
    redis: Arc<RedisClient>,
}

impl RedisCacheStore {
    pub fn new(redis: Arc<RedisClient>) -> Self {
        Self { redis }
    }

    /// 启动时检查 Redis 是否可达
    pub async fn ping(&self) -> Result<(), CacheError> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;
        let result: Option<String> = conn.get(key).await?;
        Ok(result)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;
        // SET EX 只接受整秒
        let seconds = ttl.as_secs().max(1);
        let _: () = conn.set_ex(key, value, seconds).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;
        let deleted: u64 = conn.del(key).await?;
        Ok(deleted > 0)
    }

    async fn delete_matching(&self, pattern: &str) -> Result<u64, CacheError> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;
        let keys: Vec<String> = conn.keys(pattern).await?;

        let mut deleted = 0;
        for key in keys {
            let result: redis::RedisResult<u64> = conn.del(&key).await;
            match result {
                Ok(n) => deleted += n,
                Err(e) => tracing::warn!(key = %key, error = %e, "Failed to delete cache key"),
            }
        }

        Ok(deleted)
    }
}
