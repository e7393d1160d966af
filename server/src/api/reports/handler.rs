//! Report API Handlers
//!
//! Each endpoint issues the date-bucketed aggregate queries for one chart
//! and returns plain rows.

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::NaiveDate;

use crate::core::ServerState;
use crate::db::repository::report::{self, Granularity};
use crate::utils::{AppError, AppResult};
use shared::models::{
    DashboardSummary, ExpenseByCategory, PaymentMethodBreakdown, RevenuePoint, TopService,
};

/// Common date-range query; dates are YYYY-MM-DD inclusive.
/// Defaults to the last 30 days when absent.
#[derive(serde::Deserialize)]
pub struct RangeQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub branch_id: Option<i64>,
}

fn parse_date(value: &str, field: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("{field} must be a YYYY-MM-DD date")))
}

fn resolve_range(state: &ServerState, query: &RangeQuery) -> AppResult<(NaiveDate, NaiveDate)> {
    let today = chrono::Utc::now()
        .with_timezone(&state.config.report_timezone)
        .date_naive();
    let to = match &query.to {
        Some(v) => parse_date(v, "to")?,
        None => today,
    };
    let from = match &query.from {
        Some(v) => parse_date(v, "from")?,
        None => to - chrono::Duration::days(29),
    };
    Ok((from, to))
}

/// GET /api/reports/dashboard - 仪表盘汇总
pub async fn dashboard(
    State(state): State<ServerState>,
    Query(query): Query<RangeQuery>,
) -> AppResult<Json<DashboardSummary>> {
    let (from, to) = resolve_range(&state, &query)?;
    let summary = report::dashboard(
        &state.pool,
        state.config.report_timezone,
        from,
        to,
        query.branch_id,
    )
    .await?;
    Ok(Json(summary))
}

#[derive(serde::Deserialize)]
pub struct RevenueQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub branch_id: Option<i64>,
    /// day | month (default day)
    pub granularity: Option<String>,
}

/// GET /api/reports/revenue - 营收曲线（按日或按月）
pub async fn revenue(
    State(state): State<ServerState>,
    Query(query): Query<RevenueQuery>,
) -> AppResult<Json<Vec<RevenuePoint>>> {
    let range = RangeQuery {
        from: query.from,
        to: query.to,
        branch_id: query.branch_id,
    };
    let (from, to) = resolve_range(&state, &range)?;
    let granularity: Granularity = query
        .granularity
        .as_deref()
        .unwrap_or("day")
        .parse()
        .map_err(AppError::from)?;

    let points = report::revenue_buckets(
        &state.pool,
        state.config.report_timezone,
        from,
        to,
        granularity,
        range.branch_id,
    )
    .await?;
    Ok(Json(points))
}

/// GET /api/reports/expenses - 按类别的支出汇总
pub async fn expenses(
    State(state): State<ServerState>,
    Query(query): Query<RangeQuery>,
) -> AppResult<Json<Vec<ExpenseByCategory>>> {
    let (from, to) = resolve_range(&state, &query)?;
    let rows = report::expenses_by_category(&state.pool, from, to, query.branch_id).await?;
    Ok(Json(rows))
}

/// GET /api/reports/payment-methods - 按支付方式的收款汇总
pub async fn payment_methods(
    State(state): State<ServerState>,
    Query(query): Query<RangeQuery>,
) -> AppResult<Json<Vec<PaymentMethodBreakdown>>> {
    let (from, to) = resolve_range(&state, &query)?;
    let rows = report::payment_methods(
        &state.pool,
        state.config.report_timezone,
        from,
        to,
        query.branch_id,
    )
    .await?;
    Ok(Json(rows))
}

/// GET /api/reports/top-services - 服务营收排行
pub async fn top_services(
    State(state): State<ServerState>,
    Query(query): Query<RangeQuery>,
) -> AppResult<Json<Vec<TopService>>> {
    let (from, to) = resolve_range(&state, &query)?;
    let rows = report::top_services(
        &state.pool,
        state.config.report_timezone,
        from,
        to,
        query.branch_id,
    )
    .await?;
    Ok(Json(rows))
}
