//! Pricing Rule API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use validator::Validate;

use crate::core::ServerState;
use crate::db::repository::pricing_rule;
use crate::utils::{AppError, AppResult};
use shared::models::{PriceQuote, PricingRule, PricingRuleCreate, PricingRuleUpdate};

const RESOURCE: &str = "pricing_rule";

/// GET /api/pricing-rules - 获取所有价格规则
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<PricingRule>>> {
    let rules = pricing_rule::find_all(&state.pool).await?;
    Ok(Json(rules))
}

#[derive(serde::Deserialize)]
pub struct QuoteQuery {
    pub service_type_id: i64,
    pub laundry_category_id: i64,
}

/// GET /api/pricing-rules/quote - 查询单价（收衣报价）
pub async fn quote(
    State(state): State<ServerState>,
    Query(query): Query<QuoteQuery>,
) -> AppResult<Json<PriceQuote>> {
    let quote = pricing_rule::quote(&state.pool, query.service_type_id, query.laundry_category_id)
        .await?
        .ok_or_else(|| {
            AppError::not_found(format!(
                "No pricing rule for service {} / category {}",
                query.service_type_id, query.laundry_category_id
            ))
        })?;
    Ok(Json(quote))
}

/// GET /api/pricing-rules/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<PricingRule>> {
    let rule = pricing_rule::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Pricing rule {id}")))?;
    Ok(Json(rule))
}

/// POST /api/pricing-rules - 创建价格规则
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<PricingRuleCreate>,
) -> AppResult<Json<PricingRule>> {
    payload.validate()?;
    let rule = pricing_rule::create(&state.pool, payload).await?;
    state.notify_changed(RESOURCE);
    Ok(Json(rule))
}

/// PUT /api/pricing-rules/:id - 更新价格规则
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<PricingRuleUpdate>,
) -> AppResult<Json<PricingRule>> {
    payload.validate()?;
    let rule = pricing_rule::update(&state.pool, id, payload).await?;
    state.notify_changed(RESOURCE);
    Ok(Json(rule))
}

/// DELETE /api/pricing-rules/:id - 删除价格规则（软删除）
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let result = pricing_rule::delete(&state.pool, id).await?;
    if result {
        state.notify_changed(RESOURCE);
    }
    Ok(Json(result))
}
