// 缓存模块
// 缓存能力接口、键生成和 Redis / 内存两种实现

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub mod keys;
pub mod operations;

pub use operations::memory_store::InMemoryCacheStore;
pub use operations::redis_store::RedisCacheStore;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache unavailable: {0}")]
    Unavailable(String),
}

impl From<redis::RedisError> for CacheError {
    fn from(e: redis::RedisError) -> Self {
        CacheError::Unavailable(e.to_string())
    }
}

/// 带过期时间的字符串键值缓存
///
/// 键不存在或已过期时 `get` 返回 `Ok(None)`，这不是错误。
/// `delete_matching` 按 glob 模式逐个删除匹配的键，开销与匹配数量成正比，
/// 且不是原子操作：单个键删除失败会被跳过，返回值为实际删除的数量。
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;

    /// 删除单个键，返回键是否存在
    async fn delete(&self, key: &str) -> Result<bool, CacheError>;

    async fn delete_matching(&self, pattern: &str) -> Result<u64, CacheError>;
}
