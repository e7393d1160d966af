//! User API Handlers
//!
//! Account management: create/update/list, role assignment, ban/unban.
//! All routes sit behind the admin middleware.

use axum::{
    Json,
    extract::{Extension, Path, State},
};
use validator::Validate;

use crate::auth::CurrentUser;
use crate::auth::permissions::is_valid_role;
use crate::core::ServerState;
use crate::db::repository::user;
use crate::security_log;
use crate::utils::{AppError, AppResult};
use shared::models::{BanRequest, SetRoleRequest, UserCreate, UserResponse, UserUpdate};

const RESOURCE: &str = "user";

/// GET /api/users - 获取所有启用用户
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<UserResponse>>> {
    let users = user::find_all(&state.pool, false).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// GET /api/users/all - 获取所有用户（含停用）
pub async fn list_with_inactive(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = user::find_all(&state.pool, true).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// GET /api/users/:id - 获取单个用户
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<UserResponse>> {
    let account = user::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {id}")))?;
    Ok(Json(UserResponse::from(account)))
}

/// POST /api/users - 创建用户
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<UserCreate>,
) -> AppResult<Json<UserResponse>> {
    payload.validate()?;
    if !is_valid_role(&payload.role) {
        return Err(AppError::validation(format!(
            "Unknown role: {}",
            payload.role
        )));
    }

    let account = user::create(&state.pool, payload).await?;

    security_log!(
        "INFO",
        "user_created",
        operator_id = current_user.id,
        user_id = account.id
    );
    state.notify_changed(RESOURCE);

    Ok(Json(UserResponse::from(account)))
}

/// PUT /api/users/:id - 更新用户
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<UserResponse>> {
    payload.validate()?;
    let account = user::update(&state.pool, id, payload).await?;
    state.notify_changed(RESOURCE);
    Ok(Json(UserResponse::from(account)))
}

/// PUT /api/users/:id/role - 设置角色
///
/// Idempotent and exclusive: the new role replaces the previous one.
pub async fn set_role(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<SetRoleRequest>,
) -> AppResult<Json<UserResponse>> {
    if !is_valid_role(&payload.role) {
        return Err(AppError::validation(format!(
            "Unknown role: {}",
            payload.role
        )));
    }
    if current_user.id == id && payload.role != "admin" {
        return Err(AppError::business_rule(
            "Administrators cannot demote their own account",
        ));
    }

    let account = user::set_role(&state.pool, id, &payload.role).await?;

    security_log!(
        "INFO",
        "role_changed",
        operator_id = current_user.id,
        user_id = id,
        role = payload.role.clone()
    );
    state.notify_changed(RESOURCE);

    Ok(Json(UserResponse::from(account)))
}

/// POST /api/users/:id/ban - 封禁用户
pub async fn ban(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<BanRequest>,
) -> AppResult<Json<UserResponse>> {
    payload.validate()?;
    if current_user.id == id {
        return Err(AppError::business_rule(
            "Administrators cannot ban their own account",
        ));
    }

    let account = user::set_banned(&state.pool, id, true, payload.reason).await?;

    security_log!(
        "WARN",
        "user_banned",
        operator_id = current_user.id,
        user_id = id
    );
    state.notify_changed(RESOURCE);

    Ok(Json(UserResponse::from(account)))
}

/// POST /api/users/:id/unban - 解封用户
pub async fn unban(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<UserResponse>> {
    let account = user::set_banned(&state.pool, id, false, None).await?;

    security_log!(
        "INFO",
        "user_unbanned",
        operator_id = current_user.id,
        user_id = id
    );
    state.notify_changed(RESOURCE);

    Ok(Json(UserResponse::from(account)))
}

/// DELETE /api/users/:id - 停用用户（软删除）
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    if current_user.id == id {
        return Err(AppError::business_rule(
            "Administrators cannot delete their own account",
        ));
    }

    let result = user::delete(&state.pool, id).await?;
    if result {
        security_log!(
            "WARN",
            "user_deleted",
            operator_id = current_user.id,
            user_id = id
        );
        state.notify_changed(RESOURCE);
    }
    Ok(Json(result))
}
