//! Order API Handlers
//!
//! Order intake, status updates and payment recording.

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use serde::Serialize;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::order::OrderFilter;
use crate::db::repository::{order, payment};
use crate::utils::{AppError, AppResult};
use shared::models::{
    Order, OrderCreate, OrderStatus, OrderUpdate, OrderWithDetails, Payment, PaymentCreate,
    PaymentStatus,
};

const RESOURCE: &str = "order";

#[derive(serde::Deserialize)]
pub struct ListQuery {
    pub branch_id: Option<i64>,
    pub customer_id: Option<i64>,
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    /// created_at >= from (Unix millis)
    pub from: Option<i64>,
    /// created_at < to (Unix millis)
    pub to: Option<i64>,
}

/// GET /api/orders - 订单列表（可过滤）
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let filter = OrderFilter {
        branch_id: query.branch_id,
        customer_id: query.customer_id,
        status: query.status,
        payment_status: query.payment_status,
        from: query.from,
        to: query.to,
    };
    let orders = order::find_all(&state.pool, filter).await?;
    Ok(Json(orders))
}

/// GET /api/orders/:id - 订单详情（含明细与收款）
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<OrderWithDetails>> {
    let detail = order::find_detail(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {id}")))?;
    Ok(Json(detail))
}

/// POST /api/orders - 创建订单（明细 + 可选首付，单事务）
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<OrderWithDetails>> {
    payload.validate()?;
    let detail = order::create(&state.pool, payload, current_user.id).await?;

    tracing::info!(
        order_id = detail.order.id,
        order_number = %detail.order.order_number,
        total = detail.order.total_amount,
        "Order created"
    );
    state.notify_changed(RESOURCE);

    Ok(Json(detail))
}

/// PUT /api/orders/:id - 更新订单（状态流转、折扣、备注）
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderUpdate>,
) -> AppResult<Json<Order>> {
    payload.validate()?;
    let order = order::update(&state.pool, id, payload).await?;
    state.notify_changed(RESOURCE);
    Ok(Json(order))
}

/// GET /api/orders/:id/payments - 订单收款记录
pub async fn list_payments(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<Payment>>> {
    // 404 for unknown orders rather than an empty list
    order::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {id}")))?;
    let payments = payment::find_by_order(&state.pool, id).await?;
    Ok(Json(payments))
}

/// Payment response: the payment plus the refreshed order
#[derive(Serialize)]
pub struct PaymentRecorded {
    pub payment: Payment,
    pub order: Order,
}

/// POST /api/orders/:id/payments - 登记收款
pub async fn record_payment(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<PaymentCreate>,
) -> AppResult<Json<PaymentRecorded>> {
    payload.validate()?;
    let (payment, order) = payment::record(&state.pool, id, payload, current_user.id).await?;

    tracing::info!(
        order_id = id,
        amount = payment.amount,
        payment_status = ?order.payment_status,
        "Payment recorded"
    );
    state.notify_changed(RESOURCE);
    state.notify_changed("payment");

    Ok(Json(PaymentRecorded { payment, order }))
}
