use std::sync::Arc;

use axum::{
    Router,
    http::StatusCode,
    routing::{get, post},
};
use tower_http::timeout::TimeoutLayer;

use crate::{
    AppState,
    middleware::{RateLimiter, log_errors, rate_limit},
};

pub mod user;

/// 创建主路由，所有请求先经过限流
pub fn create_router(state: AppState, limiter: Arc<RateLimiter>) -> Router {
    let timeout = state.config.request_timeout();

    Router::new()
        .route("/user", post(user::create_user))
        .route("/user/{id}", get(user::get_user).put(user::update_user))
        .route("/users", get(user::get_users))
        .route("/search-users", get(user::search_users))
        .layer(axum::middleware::from_fn(log_errors))
        .layer(axum::middleware::from_fn_with_state(limiter, rate_limit))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .with_state(state)
}
