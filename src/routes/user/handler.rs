use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
};

use crate::{
    AppState,
    error::{AppError, AppResult},
};

use super::model::{PageQuery, SearchQuery, UserInput};

/// 已序列化的 JSON 负载直接写回
fn json_payload(payload: String) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/json")], payload)
}

fn parse_body(body: &Bytes) -> AppResult<UserInput> {
    serde_json::from_slice(body).map_err(|e| AppError::BadInput(e.to_string()))
}

#[axum::debug_handler]
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    tracing::debug!("Requested user ID: {}", user_id);
    let payload = state.users.get_user(&user_id).await?;
    Ok(json_payload(payload))
}

#[axum::debug_handler]
pub async fn get_users(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<impl IntoResponse> {
    let payload = state
        .users
        .get_page(query.page.as_deref(), query.limit.as_deref())
        .await?;
    Ok(json_payload(payload))
}

#[axum::debug_handler]
pub async fn search_users(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<impl IntoResponse> {
    let payload = state
        .users
        .search(query.query.as_deref().unwrap_or_default())
        .await?;
    Ok(json_payload(payload))
}

#[axum::debug_handler]
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let input = parse_body(&body)?;
    let payload = state
        .users
        .update_user(&user_id, &input.name, &input.email)
        .await?;
    Ok(json_payload(payload))
}

#[axum::debug_handler]
pub async fn create_user(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let input = parse_body(&body)?;
    let payload = state.users.create_user(&input.name, &input.email).await?;
    Ok(json_payload(payload))
}
