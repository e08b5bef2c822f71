//! Booking API Handlers
//!
//! 状态变更有两种入口：PATCH 携带新 status（通用编辑），
//! 或 POST /{id}/{action}（confirm / cancel / reject / complete / no-show）。

use axum::{
    Json,
    extract::{Path, State},
};

use crate::state::AppState;
use shared::error::{AppError, AppResult};
use shared::models::{Booking, BookingCommand, BookingCreate, BookingUpdate};

/// POST /api/bookings - 创建预约
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<BookingCreate>,
) -> AppResult<Json<Booking>> {
    let booking = state.bookings.create(payload).await?;
    Ok(Json(booking))
}

/// GET /api/bookings/:id
pub async fn get_by_id(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<Booking>> {
    let booking = state.bookings.get(id).await?;
    Ok(Json(booking))
}

/// PATCH /api/bookings/:id - 部分更新（可带 expected_version 做乐观锁）
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<BookingUpdate>,
) -> AppResult<Json<Booking>> {
    let booking = state.bookings.update(id, payload).await?;
    Ok(Json(booking))
}

/// POST /api/bookings/:id/:action - 显式状态命令
pub async fn apply_action(
    State(state): State<AppState>,
    Path((id, action)): Path<(i64, String)>,
) -> AppResult<Json<Booking>> {
    let command: BookingCommand = action
        .parse()
        .map_err(|e: String| AppError::invalid_request(e).with_detail("action", action.clone()))?;
    let booking = state.bookings.transition(id, command).await?;
    Ok(Json(booking))
}
