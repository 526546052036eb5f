use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// 用户实体，对应数据库中的 users 表
///
/// ID 由数据库分配，统一以字符串形式读写。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}
