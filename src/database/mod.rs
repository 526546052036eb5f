// 数据库模块
// 用户记录的持久化接口及其 PostgreSQL / 内存实现

use async_trait::async_trait;
use thiserror::Error;

pub mod models; // 数据库实体定义
pub mod repositories; // 存储库实现

// 重新导出常用类型，方便其他模块使用
pub use models::user::User;
pub use repositories::memory::InMemoryUserStore;
pub use repositories::user::PgUserStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            other => StoreError::Unavailable(other.to_string()),
        }
    }
}

/// 用户记录的持久化存储
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// 按 ID 查找，不存在时返回 `StoreError::NotFound`
    async fn get_by_id(&self, id: &str) -> Result<User, StoreError>;

    /// 按 limit / offset 分页，offset 原样传给底层存储
    async fn fetch_page(&self, limit: i64, offset: i64) -> Result<Vec<User>, StoreError>;

    /// 名称或邮箱包含子串（不区分大小写）
    async fn search(&self, query: &str) -> Result<Vec<User>, StoreError>;

    async fn update(&self, id: &str, name: &str, email: &str) -> Result<(), StoreError>;

    async fn insert(&self, name: &str, email: &str) -> Result<(), StoreError>;
}
