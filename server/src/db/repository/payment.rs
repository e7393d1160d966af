//! Payment Repository
//!
//! Recording a payment updates the order's paid/due amounts and derived
//! payment status in the same transaction.

use super::{RepoError, RepoResult};
use shared::models::{Order, OrderStatus, Payment, PaymentCreate};
use sqlx::SqlitePool;

use crate::orders::money;

const PAYMENT_SELECT: &str = "SELECT id, order_id, amount, method, reference, notes, \
     received_by, created_at FROM payment";

pub async fn find_by_order(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<Payment>> {
    let sql = format!("{PAYMENT_SELECT} WHERE order_id = ? ORDER BY created_at");
    let rows = sqlx::query_as::<_, Payment>(&sql)
        .bind(order_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Record a payment against an order.
///
/// Rejected when the order is cancelled or when the amount exceeds the
/// outstanding balance. Returns the payment and the refreshed order.
pub async fn record(
    pool: &SqlitePool,
    order_id: i64,
    data: PaymentCreate,
    received_by: i64,
) -> RepoResult<(Payment, Order)> {
    let mut tx = pool.begin().await?;

    let order_sql = "SELECT id, order_number, customer_id, branch_id, status, subtotal, \
         discount_type, discount_value, total_amount, amount_paid, amount_due, payment_status, \
         notes, pickup_date, created_by, created_at, updated_at FROM orders WHERE id = ?";
    let order = sqlx::query_as::<_, Order>(order_sql)
        .bind(order_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {order_id} not found")))?;

    if order.status == OrderStatus::Cancelled {
        return Err(RepoError::BusinessRule(
            "Payments cannot be recorded on a cancelled order".into(),
        ));
    }

    let amount = money::round2(data.amount);
    if amount <= 0.0 {
        return Err(RepoError::Validation("Payment amount must be positive".into()));
    }
    if amount > order.amount_due + money::MONEY_TOLERANCE {
        return Err(RepoError::BusinessRule(format!(
            "Payment {amount} exceeds outstanding balance {}",
            order.amount_due
        )));
    }

    let now = shared::util::now_millis();
    let payment_id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO payment (id, order_id, amount, method, reference, notes, received_by, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )
    .bind(payment_id)
    .bind(order_id)
    .bind(amount)
    .bind(data.method)
    .bind(&data.reference)
    .bind(&data.notes)
    .bind(received_by)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    let amount_paid = money::round2(order.amount_paid + amount);
    let (amount_due, payment_status) =
        money::derive_payment_status(order.total_amount, amount_paid);

    sqlx::query(
        "UPDATE orders SET amount_paid = ?1, amount_due = ?2, payment_status = ?3, updated_at = ?4 \
         WHERE id = ?5",
    )
    .bind(amount_paid)
    .bind(amount_due)
    .bind(payment_status)
    .bind(now)
    .bind(order_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    let payment = sqlx::query_as::<_, Payment>(&format!("{PAYMENT_SELECT} WHERE id = ?"))
        .bind(payment_id)
        .fetch_one(pool)
        .await?;
    let order = super::order::find_by_id(pool, order_id)
        .await?
        .ok_or_else(|| RepoError::Database("Order vanished after payment".into()))?;

    Ok((payment, order))
}
