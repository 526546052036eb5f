// 存储库实现
pub mod memory;
pub mod user;
