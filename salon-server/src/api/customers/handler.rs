//! Customer API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::db::repository::{booking, reward, visit};
use crate::loyalty;
use crate::state::AppState;
use shared::error::AppResult;
use shared::models::{Booking, Customer, CustomerCreate, CustomerReward, RedeemRequest, Visit};

/// POST /api/customers - 注册顾客（通知商户管理员，发送欢迎通知）
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CustomerCreate>,
) -> AppResult<Json<Customer>> {
    let customer = state.directory.register_customer(payload).await?;
    Ok(Json(customer))
}

/// GET /api/customers/:id - 顾客详情（积分 / 到店次数）
pub async fn get_by_id(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<Customer>> {
    let customer = state.directory.customer(id).await?;
    Ok(Json(customer))
}

/// GET /api/customers/:id/visits
pub async fn list_visits(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<Visit>>> {
    state.directory.customer(id).await?;
    let visits = visit::find_by_customer(&state.pool, id).await?;
    Ok(Json(visits))
}

/// GET /api/customers/:id/bookings
pub async fn list_bookings(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<Booking>>> {
    state.directory.customer(id).await?;
    let bookings = booking::find_by_customer(&state.pool, id).await?;
    Ok(Json(bookings))
}

/// GET /api/customers/:id/rewards - 已兑换奖励
pub async fn list_rewards(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<CustomerReward>>> {
    state.directory.customer(id).await?;
    let rewards = reward::find_customer_rewards(&state.pool, id).await?;
    Ok(Json(rewards))
}

/// POST /api/customers/:id/rewards - 兑换奖励
pub async fn redeem(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<RedeemRequest>,
) -> AppResult<Json<CustomerReward>> {
    let claimed = loyalty::redeem(&state.pool, id, payload.reward_id).await?;
    Ok(Json(claimed))
}
