//! Tenant API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/tenants", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handler::register))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/status", put(handler::update_status))
        .route("/{id}/preferences", put(handler::update_preferences))
        .route("/{id}/customers", get(handler::list_customers))
        .route("/{id}/staff", get(handler::list_staff))
        .route("/{id}/services", get(handler::list_services))
        .route("/{id}/rewards", get(handler::list_rewards))
        .route(
            "/{id}/notifications/ws",
            get(super::ws::handle_notifications_ws),
        )
}
