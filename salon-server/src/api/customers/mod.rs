//! Customer API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/customers", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handler::create))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/visits", get(handler::list_visits))
        .route("/{id}/bookings", get(handler::list_bookings))
        .route(
            "/{id}/rewards",
            get(handler::list_rewards).post(handler::redeem),
        )
}
