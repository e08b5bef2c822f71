//! Reward catalog API

use axum::{Json, Router, extract::State, routing::post};

use crate::db::repository::reward;
use crate::state::AppState;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Reward, RewardCreate};

pub fn router() -> Router<AppState> {
    Router::new().route("/api/rewards", post(create))
}

/// POST /api/rewards - 新建奖励（积分或到店次数兑换）
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<RewardCreate>,
) -> AppResult<Json<Reward>> {
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("Name is required").with_detail("field", "name"));
    }
    if payload.points_required < 0 || payload.visits_required.is_some_and(|v| v < 0) {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            "Reward cost cannot be negative",
        ));
    }
    state.tenants.get(payload.tenant_id).await?;
    let created = reward::create(&state.pool, &payload).await?;
    Ok(Json(created))
}
