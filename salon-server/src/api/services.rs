//! Service catalog API

use axum::{Json, Router, extract::State, routing::post};

use crate::state::AppState;
use shared::error::AppResult;
use shared::models::{Service, ServiceCreate};

pub fn router() -> Router<AppState> {
    Router::new().route("/api/services", post(create))
}

/// POST /api/services
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<ServiceCreate>,
) -> AppResult<Json<Service>> {
    let created = state.directory.add_service(payload).await?;
    Ok(Json(created))
}
