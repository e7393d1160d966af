//! Sync API
//!
//! Resource versions for client cache invalidation: every successful write
//! bumps its resource's version; clients poll this endpoint and refetch the
//! pages whose version moved.

use std::collections::HashMap;

use axum::{Json, Router, extract::State, routing::get};

use crate::core::ServerState;

/// GET /api/sync/versions - 资源版本号快照
async fn versions(State(state): State<ServerState>) -> Json<HashMap<String, u64>> {
    Json(state.resource_versions.snapshot())
}

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/sync/versions", get(versions))
}
