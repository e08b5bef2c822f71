//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`tenants`] - 商户注册、状态、邮件偏好、实时通知订阅
//! - [`users`] - 管理员账号
//! - [`customers`] - 顾客、到店记录、积分兑换
//! - [`staff`] / [`services`] - 员工与服务项目
//! - [`bookings`] - 预约生命周期
//! - [`visits`] / [`rewards`] - 到店记录与奖励
//! - [`notifications`] - 站内通知
//! - [`email_outbox`] - 邮件死信队列

pub mod bookings;
pub mod customers;
pub mod email_outbox;
pub mod health;
pub mod notifications;
pub mod rewards;
pub mod services;
pub mod staff;
pub mod tenants;
pub mod users;
pub mod visits;
pub mod ws;

use crate::state::AppState;
use axum::Router;
use http::{HeaderName, HeaderValue};
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;

/// Request ID generator (snowflake, same as resource IDs)
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = shared::util::snowflake_id().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// All routes, no middleware
pub fn build_router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(tenants::router())
        .merge(users::router())
        .merge(customers::router())
        .merge(staff::router())
        .merge(services::router())
        .merge(bookings::router())
        .merge(visits::router())
        .merge(rewards::router())
        .merge(notifications::router())
        .merge(email_outbox::router())
}

/// Fully configured application with middleware and state
pub fn build_app(state: AppState) -> Router {
    let request_id = HeaderName::from_static("x-request-id");
    // 最后添加的 layer 在最外层, SetRequestId 必须包住 PropagateRequestId
    build_router()
        .layer(CorsLayer::permissive())
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(request_id, XRequestId))
        .with_state(state)
}
