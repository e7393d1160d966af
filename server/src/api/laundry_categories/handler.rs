//! Laundry Category API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use validator::Validate;

use crate::core::ServerState;
use crate::db::repository::laundry_category;
use crate::utils::{AppError, AppResult};
use shared::models::{LaundryCategory, LaundryCategoryCreate, LaundryCategoryUpdate};

const RESOURCE: &str = "laundry_category";

/// GET /api/laundry-categories - 获取所有衣物类别
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<LaundryCategory>>> {
    let categories = laundry_category::find_all(&state.pool).await?;
    Ok(Json(categories))
}

/// GET /api/laundry-categories/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<LaundryCategory>> {
    let category = laundry_category::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Laundry category {id}")))?;
    Ok(Json(category))
}

/// POST /api/laundry-categories - 创建衣物类别
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<LaundryCategoryCreate>,
) -> AppResult<Json<LaundryCategory>> {
    payload.validate()?;
    let category = laundry_category::create(&state.pool, payload).await?;
    state.notify_changed(RESOURCE);
    Ok(Json(category))
}

/// PUT /api/laundry-categories/:id - 更新衣物类别
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<LaundryCategoryUpdate>,
) -> AppResult<Json<LaundryCategory>> {
    payload.validate()?;
    let category = laundry_category::update(&state.pool, id, payload).await?;
    state.notify_changed(RESOURCE);
    Ok(Json(category))
}

/// DELETE /api/laundry-categories/:id - 删除衣物类别（软删除）
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let result = laundry_category::delete(&state.pool, id).await?;
    if result {
        state.notify_changed(RESOURCE);
    }
    Ok(Json(result))
}
