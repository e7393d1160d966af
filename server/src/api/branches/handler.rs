//! Branch API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use validator::Validate;

use crate::core::ServerState;
use crate::db::repository::branch;
use crate::utils::{AppError, AppResult};
use shared::models::{Branch, BranchCreate, BranchUpdate};

const RESOURCE: &str = "branch";

/// GET /api/branches - 获取所有门店
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Branch>>> {
    let branches = branch::find_all(&state.pool).await?;
    Ok(Json(branches))
}

/// GET /api/branches/:id - 获取单个门店
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Branch>> {
    let branch = branch::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Branch {id}")))?;
    Ok(Json(branch))
}

/// POST /api/branches - 创建门店
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<BranchCreate>,
) -> AppResult<Json<Branch>> {
    payload.validate()?;
    let branch = branch::create(&state.pool, payload).await?;
    state.notify_changed(RESOURCE);
    Ok(Json(branch))
}

/// PUT /api/branches/:id - 更新门店
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<BranchUpdate>,
) -> AppResult<Json<Branch>> {
    payload.validate()?;
    let branch = branch::update(&state.pool, id, payload).await?;
    state.notify_changed(RESOURCE);
    Ok(Json(branch))
}

/// DELETE /api/branches/:id - 删除门店（软删除）
///
/// 仍被用户、客户或订单引用的门店不可删除
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let result = branch::delete(&state.pool, id).await?;
    if result {
        state.notify_changed(RESOURCE);
    }
    Ok(Json(result))
}
