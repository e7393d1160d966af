//! Expense API Handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::expense::{self, ExpenseFilter};
use crate::utils::validation::validate_date;
use crate::utils::{AppError, AppResult};
use shared::models::{Expense, ExpenseCreate, ExpenseUpdate, ExpenseWithCategory};

const RESOURCE: &str = "expense";

#[derive(serde::Deserialize)]
pub struct ListQuery {
    pub branch_id: Option<i64>,
    pub category_id: Option<i64>,
    /// YYYY-MM-DD, inclusive
    pub from: Option<String>,
    /// YYYY-MM-DD, inclusive
    pub to: Option<String>,
}

/// GET /api/expenses - 支出列表（可过滤）
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<ExpenseWithCategory>>> {
    if let Some(from) = &query.from {
        validate_date(from, "from")?;
    }
    if let Some(to) = &query.to {
        validate_date(to, "to")?;
    }
    let filter = ExpenseFilter {
        branch_id: query.branch_id,
        category_id: query.category_id,
        from: query.from,
        to: query.to,
    };
    let expenses = expense::find_all(&state.pool, filter).await?;
    Ok(Json(expenses))
}

/// GET /api/expenses/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Expense>> {
    let expense = expense::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Expense {id}")))?;
    Ok(Json(expense))
}

/// POST /api/expenses - 记录支出
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<ExpenseCreate>,
) -> AppResult<Json<Expense>> {
    payload.validate()?;
    validate_date(&payload.incurred_on, "incurred_on")?;

    let expense = expense::create(&state.pool, payload, current_user.id).await?;
    state.notify_changed(RESOURCE);
    Ok(Json(expense))
}

/// PUT /api/expenses/:id - 更新支出
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ExpenseUpdate>,
) -> AppResult<Json<Expense>> {
    payload.validate()?;
    if let Some(incurred_on) = &payload.incurred_on {
        validate_date(incurred_on, "incurred_on")?;
    }

    let expense = expense::update(&state.pool, id, payload).await?;
    state.notify_changed(RESOURCE);
    Ok(Json(expense))
}

/// DELETE /api/expenses/:id - 删除支出
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let result = expense::delete(&state.pool, id).await?;
    if result {
        state.notify_changed(RESOURCE);
    }
    Ok(Json(result))
}
