/// 缓存操作
/// 提供 CacheStore 的具体实现

// Redis 实现
pub mod redis_store;

// 进程内实现，用于测试和本地开发
pub mod memory_store;
