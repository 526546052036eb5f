/// 缓存键模块
/// 提供各种缓存键生成函数

// 用户缓存键模块
pub mod user_keys;

pub use user_keys::{
    USERS_PAGE_PATTERN, USERS_SEARCH_PATTERN, normalize_query, user_key, users_page_key,
    users_search_key,
};
