//! Customer API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use validator::Validate;

use crate::core::ServerState;
use crate::db::repository::customer;
use crate::utils::{AppError, AppResult};
use shared::models::{Customer, CustomerCreate, CustomerUpdate};

const RESOURCE: &str = "customer";

#[derive(serde::Deserialize)]
pub struct ListQuery {
    pub branch_id: Option<i64>,
}

#[derive(serde::Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

/// GET /api/customers - 获取所有客户
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Customer>>> {
    let customers = customer::find_all(&state.pool, query.branch_id).await?;
    Ok(Json(customers))
}

/// GET /api/customers/search?q=xxx - 搜索客户（姓名/电话/邮箱）
pub async fn search(
    State(state): State<ServerState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<Customer>>> {
    let customers = customer::search(&state.pool, &query.q).await?;
    Ok(Json(customers))
}

/// GET /api/customers/:id - 获取单个客户
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Customer>> {
    let customer = customer::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Customer {id}")))?;
    Ok(Json(customer))
}

/// POST /api/customers - 创建客户
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CustomerCreate>,
) -> AppResult<Json<Customer>> {
    payload.validate()?;
    let customer = customer::create(&state.pool, payload).await?;
    state.notify_changed(RESOURCE);
    Ok(Json(customer))
}

/// PUT /api/customers/:id - 更新客户
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<CustomerUpdate>,
) -> AppResult<Json<Customer>> {
    payload.validate()?;
    let customer = customer::update(&state.pool, id, payload).await?;
    state.notify_changed(RESOURCE);
    Ok(Json(customer))
}

/// DELETE /api/customers/:id - 删除客户（软删除）
///
/// 有订单的客户不可删除
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let result = customer::delete(&state.pool, id).await?;
    if result {
        state.notify_changed(RESOURCE);
    }
    Ok(Json(result))
}
