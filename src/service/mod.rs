// 业务服务
// 缓存旁路读写协调

pub mod user;

pub use user::{CachePolicy, UserService, parse_pagination};
