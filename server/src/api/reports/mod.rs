//! Report API Module

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_permission;
use crate::core::ServerState;

/// Report router - 全部需要 reports:view
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/reports", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/dashboard", get(handler::dashboard))
        .route("/revenue", get(handler::revenue))
        .route("/expenses", get(handler::expenses))
        .route("/payment-methods", get(handler::payment_methods))
        .route("/top-services", get(handler::top_services))
        .layer(middleware::from_fn(require_permission("reports:view")))
}
