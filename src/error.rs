use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// 请求级错误，每个变体对应一个 HTTP 状态码
#[derive(Debug, Error)]
pub enum AppError {
    #[error("User not found")]
    NotFound,
    #[error("Invalid request: {0}")]
    BadInput(String),
    /// 详细原因只写日志，不返回给客户端
    #[error("Internal server error")]
    StoreUnavailable(String),
    #[error("Rate limit exceeded")]
    RateLimited,
}

#[derive(Serialize)]
struct ErrorResponse {
    code: i32,
    error_message: String,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadInput(_) => StatusCode::BAD_REQUEST,
            AppError::StoreUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse {
            code: status.as_u16() as i32,
            error_message: self.to_string(),
        });

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
