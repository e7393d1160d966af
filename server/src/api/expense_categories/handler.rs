//! Expense Category API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use validator::Validate;

use crate::core::ServerState;
use crate::db::repository::expense_category;
use crate::utils::{AppError, AppResult};
use shared::models::{ExpenseCategory, ExpenseCategoryCreate, ExpenseCategoryUpdate};

const RESOURCE: &str = "expense_category";

/// GET /api/expense-categories - 获取所有支出类别
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<ExpenseCategory>>> {
    let categories = expense_category::find_all(&state.pool).await?;
    Ok(Json(categories))
}

/// GET /api/expense-categories/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ExpenseCategory>> {
    let category = expense_category::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Expense category {id}")))?;
    Ok(Json(category))
}

/// POST /api/expense-categories - 创建支出类别
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseCategoryCreate>,
) -> AppResult<Json<ExpenseCategory>> {
    payload.validate()?;
    let category = expense_category::create(&state.pool, payload).await?;
    state.notify_changed(RESOURCE);
    Ok(Json(category))
}

/// PUT /api/expense-categories/:id - 更新支出类别
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ExpenseCategoryUpdate>,
) -> AppResult<Json<ExpenseCategory>> {
    payload.validate()?;
    let category = expense_category::update(&state.pool, id, payload).await?;
    state.notify_changed(RESOURCE);
    Ok(Json(category))
}

/// DELETE /api/expense-categories/:id - 删除支出类别（软删除）
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let result = expense_category::delete(&state.pool, id).await?;
    if result {
        state.notify_changed(RESOURCE);
    }
    Ok(Json(result))
}
