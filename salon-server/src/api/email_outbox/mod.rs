//! Email outbox API 模块（死信查看与重投）

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/email-outbox", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/dead", get(handler::list_dead))
        .route("/{id}/retry", post(handler::retry))
}
