//! Email outbox API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::db::repository::outbox;
use crate::state::AppState;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{OutboxEmail, OutboxStatus};

/// GET /api/email-outbox/dead - 放弃投递的邮件
pub async fn list_dead(State(state): State<AppState>) -> AppResult<Json<Vec<OutboxEmail>>> {
    let dead = outbox::find_dead(&state.pool).await?;
    Ok(Json(dead))
}

/// POST /api/email-outbox/:id/retry - 死信重新入队
pub async fn retry(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<OutboxEmail>> {
    let entry = outbox::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OutboxEmailNotFound))?;
    if entry.status != OutboxStatus::Dead || !state.outbox.retry_dead(id).await? {
        return Err(AppError::new(ErrorCode::OutboxEmailNotDead).with_detail("id", id));
    }
    let requeued = outbox::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OutboxEmailNotFound))?;
    Ok(Json(requeued))
}
