//! Staff API

use axum::{Json, Router, extract::State, routing::post};

use crate::state::AppState;
use shared::error::AppResult;
use shared::models::{StaffCreate, StaffMember};

pub fn router() -> Router<AppState> {
    Router::new().route("/api/staff", post(create))
}

/// POST /api/staff - 添加员工（站内通知商户管理员）
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<StaffCreate>,
) -> AppResult<Json<StaffMember>> {
    let member = state.directory.add_staff(payload).await?;
    Ok(Json(member))
}
