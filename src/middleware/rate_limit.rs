use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::time::Instant;

use crate::{config::Config, error::AppError};

/// 令牌桶状态，令牌数始终在 [0, capacity] 内
#[derive(Debug)]
struct TokenBucket {
    tokens: u32,
    last_refill: Instant,
}

/// 进程级单桶限流器
///
/// 每次请求先惰性补充令牌：距上次补充超过一个窗口时直接重置为满，
/// 空闲期间不会累积额外额度。有令牌则消耗一个并放行，否则拒绝。
/// 补充与扣减在同一把锁内完成。
#[derive(Debug)]
pub struct RateLimiter {
    capacity: u32,
    interval: Duration,
    bucket: Mutex<TokenBucket>,
}

impl RateLimiter {
    pub fn new(capacity: u32, interval: Duration) -> Self {
        Self {
            capacity,
            interval,
            bucket: Mutex::new(TokenBucket {
                tokens: capacity,
                last_refill: Instant::now(),
            }),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.rate_limit_requests, config.rate_limit_window())
    }

    /// 尝试获取一个令牌，返回是否放行
    pub fn try_acquire(&self) -> bool {
        let mut bucket = self.bucket.lock().unwrap_or_else(|e| e.into_inner());

        let now = Instant::now();
        if now.duration_since(bucket.last_refill) >= self.interval {
            bucket.tokens = self.capacity;
            bucket.last_refill = now;
        }

        if bucket.tokens > 0 {
            bucket.tokens -= 1;
            true
        } else {
            false
        }
    }

    /// 当前剩余令牌数（不触发补充）
    #[cfg(test)]
    fn available(&self) -> u32 {
        self.bucket.lock().unwrap_or_else(|e| e.into_inner()).tokens
    }
}

/// 客户端 IP，仅用于日志
fn client_ip(req: &Request<Body>) -> String {
    let remote_ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.ip().to_string());

    req.headers()
        .get("x-real-ip")
        .and_then(|h| h.to_str().ok())
        .or_else(|| {
            req.headers()
                .get("x-forwarded-for")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.split(',').find(|ip| !ip.trim().is_empty()))
        })
        .or(remote_ip.as_deref())
        .unwrap_or("unknown")
        .trim()
        .to_string()
}

pub async fn rate_limit(
    State(limiter): State<Arc<RateLimiter>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if !limiter.try_acquire() {
        tracing::warn!(
            ip = %client_ip(&req),
            method = %req.method(),
            uri = %req.uri(),
            "Rate limit exceeded"
        );
        return AppError::RateLimited.into_response();
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, http::StatusCode, routing::get};
    use tower::ServiceExt;

    #[tokio::test(start_paused = true)]
    async fn second_request_within_window_is_rejected() {
        let limiter = RateLimiter::new(1, Duration::from_secs(1));

        assert!(limiter.try_acquire());
        tokio::time::advance(Duration::from_millis(100)).await;
        assert!(!limiter.try_acquire());
        assert_eq!(limiter.available(), 0);

        tokio::time::advance(Duration::from_millis(900)).await;
        assert!(limiter.try_acquire());
    }

    #[tokio::test(start_paused = true)]
    async fn idle_gap_does_not_accumulate_credit() {
        let limiter = RateLimiter::new(3, Duration::from_secs(1));
        assert!(limiter.try_acquire());

        tokio::time::advance(Duration::from_secs(60)).await;

        let admitted = (0..10).filter(|_| limiter.try_acquire()).count();
        assert_eq!(admitted, 3);
        assert_eq!(limiter.available(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn rejection_leaves_window_unchanged() {
        let limiter = RateLimiter::new(2, Duration::from_secs(1));
        assert!(limiter.try_acquire());
        assert!(limiter.try_acquire());

        for _ in 0..5 {
            tokio::time::advance(Duration::from_millis(150)).await;
            assert!(!limiter.try_acquire());
        }

        // 拒绝不会推迟补充时间点
        tokio::time::advance(Duration::from_millis(250)).await;
        assert!(limiter.try_acquire());
        assert_eq!(limiter.available(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_callers_never_exceed_capacity() {
        let limiter = Arc::new(RateLimiter::new(5, Duration::from_secs(3600)));
        let start = Arc::new(tokio::sync::Barrier::new(64));

        // 所有任务在屏障处汇合后同时抢令牌
        let handles: Vec<_> = (0..64)
            .map(|_| {
                let limiter = limiter.clone();
                let start = start.clone();
                tokio::spawn(async move {
                    start.wait().await;
                    limiter.try_acquire()
                })
            })
            .collect();

        let mut admitted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                admitted += 1;
            }
        }
        assert_eq!(admitted, 5);
    }

    #[tokio::test]
    async fn middleware_rejects_with_429() {
        let limiter = Arc::new(RateLimiter::new(1, Duration::from_secs(3600)));
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(axum::middleware::from_fn_with_state(limiter, rate_limit));

        let request = || {
            Request::builder()
                .uri("/")
                .header("x-forwarded-for", "10.0.0.1, 10.0.0.2")
                .body(Body::empty())
                .unwrap()
        };

        let first = app.clone().oneshot(request()).await.unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let second = app.oneshot(request()).await.unwrap();
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn client_ip_prefers_headers() {
        let req = Request::builder()
            .header("x-forwarded-for", " , 10.0.0.7")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_ip(&req), "10.0.0.7");

        let req = Request::builder()
            .header("x-real-ip", "192.168.1.2")
            .header("x-forwarded-for", "10.0.0.7")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_ip(&req), "192.168.1.2");

        let req = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(client_ip(&req), "unknown");
    }
}
