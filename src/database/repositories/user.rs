use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::{RecordStore, StoreError, User};

/// 解析整型主键，非数字 ID 不可能命中任何行
fn parse_id(id: &str) -> Option<i64> {
    id.trim().parse().ok()
}

/// 用户存储库的 PostgreSQL 实现
///
/// 查询在运行时校验。users.id 为整型自增主键，按整数比较以走主键索引，
/// 对外统一以文本返回。
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgUserStore {
    async fn get_by_id(&self, id: &str) -> Result<User, StoreError> {
        tracing::debug!("Fetching user with ID: {}", id);
        let Some(pk) = parse_id(id) else {
            return Err(StoreError::NotFound);
        };

        let result = sqlx::query_as::<_, User>(
            r#"
            SELECT id::text AS id, name, email
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(pk)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(e) => {
                tracing::error!("Error fetching user {}: {:?}", id, e);
                Err(e.into())
            }
        }
    }

    async fn fetch_page(&self, limit: i64, offset: i64) -> Result<Vec<User>, StoreError> {
        // offset 为负时由 PostgreSQL 拒绝，这里不做修正
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id::text AS id, name, email
            FROM users
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn search(&self, query: &str) -> Result<Vec<User>, StoreError> {
        let pattern = format!("%{}%", query);
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id::text AS id, name, email
            FROM users
            WHERE name ILIKE $1 OR email ILIKE $1
            ORDER BY id
            "#,
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn update(&self, id: &str, name: &str, email: &str) -> Result<(), StoreError> {
        // 与 0 行更新一致，非数字 ID 直接视为成功
        let Some(pk) = parse_id(id) else {
            tracing::debug!("Updated user {} (0 rows)", id);
            return Ok(());
        };

        let result = sqlx::query(
            r#"
            UPDATE users
            SET name = $1, email = $2
            WHERE id = $3
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(pk)
        .execute(&self.pool)
        .await?;

        tracing::debug!("Updated user {} ({} rows)", id, result.rows_affected());
        Ok(())
    }

    async fn insert(&self, name: &str, email: &str) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO users (name, email)
            VALUES ($1, $2)
            "#,
        )
        .bind(name)
        .bind(email)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
