//! Visit API

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};

use crate::db::repository::visit;
use crate::state::AppState;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Visit, VisitCreate};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/visits", post(create))
        .route("/api/visits/{id}", get(get_by_id))
}

/// POST /api/visits - 手动登记到店（累计积分与到店次数）
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<VisitCreate>,
) -> AppResult<Json<Visit>> {
    let recorded = state.visits.record_visit(payload).await?;
    Ok(Json(recorded))
}

/// GET /api/visits/:id
pub async fn get_by_id(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<Visit>> {
    let found = visit::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::VisitNotFound))?;
    Ok(Json(found))
}
