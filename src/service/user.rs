use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::cache::{CacheStore, keys};
use crate::config::Config;
use crate::database::{RecordStore, StoreError};
use crate::error::{AppError, AppResult};

/// 缓存写入与失效策略
#[derive(Debug, Clone)]
pub struct CachePolicy {
    pub ttl: Duration,
    /// 写操作后是否同时清理单用户和搜索缓存。
    /// 默认只清理分页列表，此时单用户缓存在 TTL 内可能是旧数据。
    pub invalidate_all_on_write: bool,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(3600),
            invalidate_all_on_write: false,
        }
    }
}

impl CachePolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            ttl: config.cache_ttl(),
            invalidate_all_on_write: config.cache_invalidate_all_on_write,
        }
    }
}

#[derive(Serialize)]
struct MessageResponse {
    message: &'static str,
}

/// 宽松解析分页参数，空值或非法值按 0 处理。
/// 返回 (page, limit, offset)，offset = (page - 1) * limit，page 为 0 时 offset 为负。
pub fn parse_pagination(page: Option<&str>, limit: Option<&str>) -> (i64, i64, i64) {
    let parse = |v: Option<&str>| v.and_then(|s| s.trim().parse::<i64>().ok()).unwrap_or(0);
    let page = parse(page);
    let limit = parse(limit);
    let offset = page.saturating_sub(1).saturating_mul(limit);
    (page, limit, offset)
}

/// 用户读写服务
///
/// 读：先查缓存，未命中时查询存储并回填缓存。
/// 写：先写存储，成功后按模式清理缓存。
/// 缓存故障只降级为未命中或跳过，不会让请求失败。
pub struct UserService {
    cache: Arc<dyn CacheStore>,
    store: Arc<dyn RecordStore>,
    policy: CachePolicy,
}

impl UserService {
    pub fn new(
        cache: Arc<dyn CacheStore>,
        store: Arc<dyn RecordStore>,
        policy: CachePolicy,
    ) -> Self {
        Self {
            cache,
            store,
            policy,
        }
    }

    /// 按 ID 获取单个用户
    pub async fn get_user(&self, id: &str) -> AppResult<String> {
        let key = keys::user_key(id);
        if let Some(cached) = self.cached(&key).await {
            return Ok(cached);
        }

        let user = self
            .store
            .get_by_id(id)
            .await
            .map_err(Self::read_failure)?;

        self.populate(&key, &user).await
    }

    /// 分页获取用户列表
    pub async fn get_page(&self, page: Option<&str>, limit: Option<&str>) -> AppResult<String> {
        let (page, limit, offset) = parse_pagination(page, limit);
        let key = keys::users_page_key(page, limit);
        if let Some(cached) = self.cached(&key).await {
            return Ok(cached);
        }

        let users = self
            .store
            .fetch_page(limit, offset)
            .await
            .map_err(Self::read_failure)?;

        self.populate(&key, &users).await
    }

    /// 按名称或邮箱子串搜索
    pub async fn search(&self, query: &str) -> AppResult<String> {
        let normalized = keys::normalize_query(query);
        let key = keys::users_search_key(&normalized);
        if let Some(cached) = self.cached(&key).await {
            return Ok(cached);
        }

        let users = self
            .store
            .search(&normalized)
            .await
            .map_err(Self::read_failure)?;

        self.populate(&key, &users).await
    }

    pub async fn update_user(&self, id: &str, name: &str, email: &str) -> AppResult<String> {
        self.store
            .update(id, name, email)
            .await
            .map_err(Self::write_failure)?;

        self.invalidate(keys::USERS_PAGE_PATTERN).await;
        if self.policy.invalidate_all_on_write {
            let key = keys::user_key(id);
            if let Err(e) = self.cache.delete(&key).await {
                tracing::warn!(key = %key, error = %e, "Cache invalidation failed");
            }
            self.invalidate(keys::USERS_SEARCH_PATTERN).await;
        }

        Self::message("User updated")
    }

    pub async fn create_user(&self, name: &str, email: &str) -> AppResult<String> {
        self.store
            .insert(name, email)
            .await
            .map_err(Self::write_failure)?;

        self.invalidate(keys::USERS_PAGE_PATTERN).await;
        if self.policy.invalidate_all_on_write {
            self.invalidate(keys::USERS_SEARCH_PATTERN).await;
        }

        Self::message("User created")
    }

    /// 读取缓存，错误按未命中处理
    async fn cached(&self, key: &str) -> Option<String> {
        match self.cache.get(key).await {
            Ok(Some(payload)) => {
                tracing::debug!(key, "Cache hit");
                Some(payload)
            }
            Ok(None) => {
                tracing::debug!(key, "Cache miss");
                None
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "Cache read failed, treating as miss");
                None
            }
        }
    }

    /// 序列化并写入缓存，写入失败不影响返回
    async fn populate<T: Serialize>(&self, key: &str, value: &T) -> AppResult<String> {
        let payload = serde_json::to_string(value)
            .map_err(|e| AppError::StoreUnavailable(format!("serialization failed: {}", e)))?;

        if let Err(e) = self.cache.set(key, &payload, self.policy.ttl).await {
            tracing::warn!(key, error = %e, "Cache write failed");
        }

        Ok(payload)
    }

    async fn invalidate(&self, pattern: &str) {
        match self.cache.delete_matching(pattern).await {
            Ok(deleted) => tracing::info!(pattern, deleted, "Invalidated cache entries"),
            Err(e) => tracing::warn!(pattern, error = %e, "Cache invalidation failed"),
        }
    }

    fn read_failure(e: StoreError) -> AppError {
        match e {
            StoreError::NotFound => AppError::NotFound,
            StoreError::Unavailable(msg) => {
                tracing::error!("Store read failed: {}", msg);
                AppError::StoreUnavailable(msg)
            }
        }
    }

    fn write_failure(e: StoreError) -> AppError {
        tracing::error!("Store write failed: {}", e);
        AppError::StoreUnavailable(e.to_string())
    }

    fn message(message: &'static str) -> AppResult<String> {
        serde_json::to_string(&MessageResponse { message })
            .map_err(|e| AppError::StoreUnavailable(format!("serialization failed: {}", e)))
    }
}
