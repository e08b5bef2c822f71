//! Tenant API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::db::repository::{customer, reward, service, staff};
use crate::state::AppState;
use shared::error::AppResult;
use shared::models::{
    Customer, EmailPreferencesUpdate, Reward, Service, StaffMember, Tenant, TenantCreate,
    TenantStatusUpdate,
};

/// POST /api/tenants - 注册商户（pending，附带默认服务目录）
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<TenantCreate>,
) -> AppResult<Json<Tenant>> {
    let tenant = state.tenants.register(payload).await?;
    Ok(Json(tenant))
}

/// GET /api/tenants/:id
pub async fn get_by_id(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<Tenant>> {
    let tenant = state.tenants.get(id).await?;
    Ok(Json(tenant))
}

/// PUT /api/tenants/:id/status - 审核 / 停用
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<TenantStatusUpdate>,
) -> AppResult<Json<Tenant>> {
    let tenant = state.tenants.set_status(id, payload.status).await?;
    Ok(Json(tenant))
}

/// PUT /api/tenants/:id/preferences - 邮件开关（部分更新）
pub async fn update_preferences(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<EmailPreferencesUpdate>,
) -> AppResult<Json<Tenant>> {
    let tenant = state.tenants.update_preferences(id, &payload).await?;
    Ok(Json(tenant))
}

/// GET /api/tenants/:id/customers
pub async fn list_customers(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<Customer>>> {
    state.tenants.get(id).await?;
    let customers = customer::find_by_tenant(&state.pool, id).await?;
    Ok(Json(customers))
}

/// GET /api/tenants/:id/staff
pub async fn list_staff(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<StaffMember>>> {
    state.tenants.get(id).await?;
    let members = staff::find_by_tenant(&state.pool, id).await?;
    Ok(Json(members))
}

/// GET /api/tenants/:id/services
pub async fn list_services(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<Service>>> {
    state.tenants.get(id).await?;
    let services = service::find_by_tenant(&state.pool, id).await?;
    Ok(Json(services))
}

/// GET /api/tenants/:id/rewards
pub async fn list_rewards(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<Reward>>> {
    state.tenants.get(id).await?;
    let rewards = reward::find_by_tenant(&state.pool, id).await?;
    Ok(Json(rewards))
}
