//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 认证相关接口（登录、找回密码）
//! - [`users`] - 用户管理接口（仅管理员）
//! - [`customers`] - 客户管理接口
//! - [`branches`] - 门店管理接口
//! - [`service_types`] - 服务类型接口
//! - [`laundry_categories`] - 衣物类别接口
//! - [`pricing_rules`] - 价格规则接口
//! - [`orders`] - 订单与收款接口
//! - [`expenses`] - 支出接口
//! - [`expense_categories`] - 支出类别接口
//! - [`reports`] - 报表接口
//! - [`sync`] - 资源版本接口（客户端缓存失效）

pub mod auth;
pub mod branches;
pub mod customers;
pub mod expense_categories;
pub mod expenses;
pub mod health;
pub mod laundry_categories;
pub mod orders;
pub mod pricing_rules;
pub mod reports;
pub mod service_types;
pub mod sync;
pub mod users;

use axum::Router;
use axum::middleware as axum_middleware;
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        Some(RequestId::new(HeaderValue::from_str(&id).unwrap()))
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        // Health API - public route
        .merge(health::router())
        // Auth API - login/forgot/reset public, rest authenticated
        .merge(auth::router())
        // Admin API - admin role required
        .merge(users::router())
        // Business APIs - authentication required
        .merge(customers::router())
        .merge(branches::router())
        .merge(service_types::router())
        .merge(laundry_categories::router())
        .merge(pricing_rules::router())
        .merge(orders::router())
        .merge(expenses::router())
        .merge(expense_categories::router())
        .merge(reports::router())
        .merge(sync::router())
}

/// Build a fully configured application with all middleware and state
///
/// This is used by both the HTTP server and the integration tests
pub fn build_app(state: &ServerState) -> Router<ServerState> {
    build_router()
        // ========== Tower HTTP Middleware ==========
        // CORS - Handle cross-origin requests
        .layer(CorsLayer::permissive())
        // Compression - Gzip compress responses
        .layer(CompressionLayer::new())
        // Trace - Request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        // ========== Application Middleware ==========
        // Request ID - Generate unique ID for each request
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        // Propagate request ID to response
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
        // JWT authentication - executes before routes, injects CurrentUser
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            crate::auth::require_auth,
        ))
}
