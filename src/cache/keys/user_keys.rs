/// 单个用户缓存键前缀
const USER_PREFIX: &str = "user:";

/// 分页列表缓存键前缀
const USERS_PAGE_PREFIX: &str = "users:page:";

/// 搜索结果缓存键前缀
const USERS_SEARCH_PREFIX: &str = "users:search:";

/// 所有分页列表缓存
pub const USERS_PAGE_PATTERN: &str = "users:page:*";

/// 所有搜索结果缓存
pub const USERS_SEARCH_PATTERN: &str = "users:search:*";

/// 生成单个用户缓存键
pub fn user_key(user_id: &str) -> String {
    format!("{}{}", USER_PREFIX, user_id)
}

/// 生成分页列表缓存键
pub fn users_page_key(page: i64, limit: i64) -> String {
    format!("{}{}:limit:{}", USERS_PAGE_PREFIX, page, limit)
}

/// 生成搜索结果缓存键，查询词需先经过 `normalize_query`
pub fn users_search_key(normalized_query: &str) -> String {
    format!("{}{}", USERS_SEARCH_PREFIX, normalized_query)
}

/// 搜索不区分大小写，去掉首尾空白并转小写后作为键
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}
