//! Order API Module

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    // 读取路由：登录即可
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/payments", get(handler::list_payments));

    // 订单写入：需要 orders:manage
    let write_routes = Router::new()
        .route("/", axum::routing::post(handler::create))
        .route("/{id}", axum::routing::put(handler::update))
        .layer(middleware::from_fn(require_permission("orders:manage")));

    // 收款登记：需要 payments:record
    let payment_routes = Router::new()
        .route("/{id}/payments", axum::routing::post(handler::record_payment))
        .layer(middleware::from_fn(require_permission("payments:record")));

    read_routes.merge(write_routes).merge(payment_routes)
}
