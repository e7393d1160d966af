//! Authentication Routes

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

/// Build authentication router
/// - /api/auth/login, /forgot-password, /reset-password: public
/// - /api/auth/me, /api/auth/logout: protected (global require_auth middleware)
pub fn router() -> Router<ServerState> {
    Router::new()
        // Public routes - no auth middleware applied
        .route("/api/auth/login", post(handler::login))
        .route("/api/auth/forgot-password", post(handler::forgot_password))
        .route("/api/auth/reset-password", post(handler::reset_password))
        // Protected routes - require authentication (handled by global require_auth middleware)
        .route("/api/auth/me", get(handler::me))
        .route("/api/auth/logout", post(handler::logout))
}
