//! Pricing Rule API Module

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/pricing-rules", routes())
}

fn routes() -> Router<ServerState> {
    // 读取路由：登录即可（收衣台需要即时报价）
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/quote", get(handler::quote))
        .route("/{id}", get(handler::get_by_id));

    let write_routes = Router::new()
        .route("/", axum::routing::post(handler::create))
        .route(
            "/{id}",
            axum::routing::put(handler::update).delete(handler::delete),
        )
        .layer(middleware::from_fn(require_permission("pricing:manage")));

    read_routes.merge(write_routes)
}
