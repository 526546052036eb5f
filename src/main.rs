use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use sqlx::Executor;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use user_cache_service::{
    AppState,
    cache::RedisCacheStore,
    config::Config,
    database::PgUserStore,
    middleware::RateLimiter,
    routes,
    service::{CachePolicy, UserService},
};

#[tokio::main]
async fn main() {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 加载配置
    let config = Config::from_env().expect("Failed to load configuration");

    // 设置数据库连接池
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                conn.execute("SET application_name = 'user_cache_service';")
                    .await?;
                Ok(())
            })
        })
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to Postgres");
    tracing::info!("Connected to PostgreSQL");

    // 设置 Redis 客户端并确认可达
    let redis_client =
        redis::Client::open(config.redis_url.clone()).expect("Failed to create Redis client");
    let cache = RedisCacheStore::new(Arc::new(redis_client));
    cache.ping().await.expect("Could not connect to Redis");
    tracing::info!("Connected to Redis");

    // 设置应用状态
    let users = UserService::new(
        Arc::new(cache),
        Arc::new(PgUserStore::new(pool)),
        CachePolicy::from_config(&config),
    );
    let state = AppState {
        users: Arc::new(users),
        config: config.clone(),
    };

    // 设置限流器
    let rate_limiter = Arc::new(RateLimiter::from_config(&config));
    tracing::info!(
        "Rate limit: {} request(s) per {:?}",
        config.rate_limit_requests,
        config.rate_limit_window()
    );

    let router = routes::create_router(state, rate_limiter);

    // 根据编译模式决定是否添加CORS
    #[cfg(debug_assertions)]
    let router = {
        tracing::debug!("Adding CORS layer for development mode");
        router.layer(tower_http::cors::CorsLayer::permissive())
    };

    // 启动服务器
    let addr = SocketAddr::new(
        config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to 0.0.0.0");
            IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED)
        }),
        config.server_port,
    );
    tracing::info!("Server listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Failed to start server");
}
