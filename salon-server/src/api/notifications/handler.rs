//! Notification API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::db::repository::notification;
use crate::state::AppState;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Notification, NotificationQuery};

/// GET /api/notifications?recipient_type=..&recipient_id=..&unread_only=true
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<NotificationQuery>,
) -> AppResult<Json<Vec<Notification>>> {
    let items = notification::find_for_recipient(
        &state.pool,
        query.recipient_type,
        query.recipient_id,
        query.unread_only,
    )
    .await?;
    Ok(Json(items))
}

/// GET /api/notifications/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Notification>> {
    let item = notification::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::NotificationNotFound))?;
    Ok(Json(item))
}

/// POST /api/notifications/:id/read - 标记已读（幂等）
pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Notification>> {
    let item = state
        .dispatcher
        .mark_read(id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::NotificationNotFound))?;
    Ok(Json(item))
}
