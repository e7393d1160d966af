//! Service Type API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use validator::Validate;

use crate::core::ServerState;
use crate::db::repository::service_type;
use crate::utils::{AppError, AppResult};
use shared::models::{ServiceType, ServiceTypeCreate, ServiceTypeUpdate};

const RESOURCE: &str = "service_type";

/// GET /api/service-types - 获取所有服务类型
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<ServiceType>>> {
    let services = service_type::find_all(&state.pool).await?;
    Ok(Json(services))
}

/// GET /api/service-types/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ServiceType>> {
    let service = service_type::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Service type {id}")))?;
    Ok(Json(service))
}

/// POST /api/service-types - 创建服务类型
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ServiceTypeCreate>,
) -> AppResult<Json<ServiceType>> {
    payload.validate()?;
    let service = service_type::create(&state.pool, payload).await?;
    state.notify_changed(RESOURCE);
    Ok(Json(service))
}

/// PUT /api/service-types/:id - 更新服务类型
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ServiceTypeUpdate>,
) -> AppResult<Json<ServiceType>> {
    payload.validate()?;
    let service = service_type::update(&state.pool, id, payload).await?;
    state.notify_changed(RESOURCE);
    Ok(Json(service))
}

/// DELETE /api/service-types/:id - 删除服务类型（软删除）
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let result = service_type::delete(&state.pool, id).await?;
    if result {
        state.notify_changed(RESOURCE);
    }
    Ok(Json(result))
}
