//! Admin user API

use axum::{Json, Router, extract::State, routing::post};

use crate::db::repository::user;
use crate::state::AppState;
use shared::error::{AppError, AppResult};
use shared::models::{User, UserCreate};

pub fn router() -> Router<AppState> {
    Router::new().route("/api/users", post(create))
}

/// POST /api/users - 创建管理员（tenant_admin 必须归属商户）
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<UserCreate>,
) -> AppResult<Json<User>> {
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("Name is required").with_detail("field", "name"));
    }
    if let Some(tenant_id) = payload.tenant_id {
        state.tenants.get(tenant_id).await?;
    }
    let created = user::create(&state.pool, &payload).await?;
    Ok(Json(created))
}
