//! User API Module

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_admin;
use crate::core::ServerState;

/// User router - 全部仅管理员可用 (users:manage)
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/users", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/all", get(handler::list_with_inactive))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/role", axum::routing::put(handler::set_role))
        .route("/{id}/ban", axum::routing::post(handler::ban))
        .route("/{id}/unban", axum::routing::post(handler::unban))
        .layer(middleware::from_fn(require_admin))
}
