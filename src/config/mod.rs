use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub database_max_connections: u32,
    pub rate_limit_requests: u32,
    pub rate_limit_window_secs: u64,
    pub cache_ttl_secs: u64,
    pub cache_invalidate_all_on_write: bool,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_url: String::new(),
            redis_url: String::new(),
            server_host: "0.0.0.0".into(),
            server_port: 3000,
            database_max_connections: 10,
            rate_limit_requests: 1,
            rate_limit_window_secs: 1,
            cache_ttl_secs: 3600,
            cache_invalidate_all_on_write: false,
            request_timeout_secs: 15,
        }
    }
}

/// 读取可选环境变量，缺失或无法解析时使用默认值
fn var_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenv::dotenv().ok();

        let defaults = Config::default();
        Ok(Config {
            database_url: env::var("DATABASE_URL")?,
            redis_url: env::var("REDIS_URL")?,
            server_host: env::var("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: var_or("SERVER_PORT", defaults.server_port),
            database_max_connections: var_or(
                "DATABASE_MAX_CONNECTIONS",
                defaults.database_max_connections,
            ),
            rate_limit_requests: var_or("RATE_LIMIT_REQUESTS", defaults.rate_limit_requests),
            rate_limit_window_secs: var_or(
                "RATE_LIMIT_WINDOW_SECS",
                defaults.rate_limit_window_secs,
            ),
            cache_ttl_secs: var_or("CACHE_TTL_SECS", defaults.cache_ttl_secs),
            cache_invalidate_all_on_write: var_or(
                "CACHE_INVALIDATE_ALL_ON_WRITE",
                defaults.cache_invalidate_all_on_write,
            ),
            request_timeout_secs: var_or("REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs),
        })
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
