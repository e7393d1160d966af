//! Order Repository
//!
//! Order intake is the one multi-step write in the system: the order row,
//! its items and an optional initial payment are inserted in a single
//! transaction.

use super::{RepoError, RepoResult, pricing_rule};
use shared::models::{
    DiscountType, Order, OrderCreate, OrderItem, OrderStatus, OrderUpdate, OrderWithDetails,
    Payment, PaymentStatus,
};
use sqlx::SqlitePool;

use crate::orders::money;

const ORDER_SELECT: &str = "SELECT id, order_number, customer_id, branch_id, status, subtotal, \
     discount_type, discount_value, total_amount, amount_paid, amount_due, payment_status, \
     notes, pickup_date, created_by, created_at, updated_at FROM orders";

const ITEM_SELECT: &str = "SELECT id, order_id, service_type_id, laundry_category_id, \
     description, quantity, unit_price, line_total FROM order_item";

const PAYMENT_SELECT: &str = "SELECT id, order_id, amount, method, reference, notes, \
     received_by, created_at FROM payment";

/// List filters; all optional, combined with AND
#[derive(Debug, Default, Clone)]
pub struct OrderFilter {
    pub branch_id: Option<i64>,
    pub customer_id: Option<i64>,
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    /// created_at >= from (millis)
    pub from: Option<i64>,
    /// created_at < to (millis)
    pub to: Option<i64>,
}

pub async fn find_all(pool: &SqlitePool, filter: OrderFilter) -> RepoResult<Vec<Order>> {
    let sql = format!(
        "{ORDER_SELECT} WHERE (?1 IS NULL OR branch_id = ?1) \
         AND (?2 IS NULL OR customer_id = ?2) \
         AND (?3 IS NULL OR status = ?3) \
         AND (?4 IS NULL OR payment_status = ?4) \
         AND (?5 IS NULL OR created_at >= ?5) \
         AND (?6 IS NULL OR created_at < ?6) \
         ORDER BY created_at DESC"
    );
    let rows = sqlx::query_as::<_, Order>(&sql)
        .bind(filter.branch_id)
        .bind(filter.customer_id)
        .bind(filter.status)
        .bind(filter.payment_status)
        .bind(filter.from)
        .bind(filter.to)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Order with customer name, items and payments
pub async fn find_detail(pool: &SqlitePool, id: i64) -> RepoResult<Option<OrderWithDetails>> {
    let Some(order) = find_by_id(pool, id).await? else {
        return Ok(None);
    };

    let customer_name: String = sqlx::query_scalar("SELECT name FROM customer WHERE id = ?")
        .bind(order.customer_id)
        .fetch_optional(pool)
        .await?
        .unwrap_or_default();

    let items_sql = format!("{ITEM_SELECT} WHERE order_id = ? ORDER BY id");
    let items = sqlx::query_as::<_, OrderItem>(&items_sql)
        .bind(id)
        .fetch_all(pool)
        .await?;

    let payments_sql = format!("{PAYMENT_SELECT} WHERE order_id = ? ORDER BY created_at");
    let payments = sqlx::query_as::<_, Payment>(&payments_sql)
        .bind(id)
        .fetch_all(pool)
        .await?;

    Ok(Some(OrderWithDetails {
        order,
        customer_name,
        items,
        payments,
    }))
}

/// Priced order line, resolved before the insert transaction
struct PricedItem {
    service_type_id: i64,
    laundry_category_id: i64,
    description: Option<String>,
    quantity: f64,
    unit_price: f64,
    line_total: f64,
}

/// Create an order with items and an optional initial payment.
///
/// Unit prices come from the active pricing rule unless the item carries an
/// override. The whole write is one transaction.
pub async fn create(
    pool: &SqlitePool,
    data: OrderCreate,
    created_by: i64,
) -> RepoResult<OrderWithDetails> {
    if data.items.is_empty() {
        return Err(RepoError::Validation("Order must have at least one item".into()));
    }

    // Referenced rows must exist before we start writing
    let customer_active: Option<bool> =
        sqlx::query_scalar("SELECT is_active FROM customer WHERE id = ?")
            .bind(data.customer_id)
            .fetch_optional(pool)
            .await?;
    match customer_active {
        None => {
            return Err(RepoError::NotFound(format!(
                "Customer {} not found",
                data.customer_id
            )));
        }
        Some(false) => {
            return Err(RepoError::BusinessRule(format!(
                "Customer {} is deactivated",
                data.customer_id
            )));
        }
        Some(true) => {}
    }

    let branch_exists: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM branch WHERE id = ? AND is_active = 1")
            .bind(data.branch_id)
            .fetch_one(pool)
            .await?;
    if branch_exists == 0 {
        return Err(RepoError::NotFound(format!("Branch {} not found", data.branch_id)));
    }

    // Resolve prices from the pricing rules
    let mut priced: Vec<PricedItem> = Vec::with_capacity(data.items.len());
    for item in &data.items {
        let quote = pricing_rule::quote(pool, item.service_type_id, item.laundry_category_id).await?;
        let (unit_price, min_charge) = match (&item.unit_price, &quote) {
            (Some(override_price), _) => (*override_price, 0.0),
            (None, Some(q)) => (q.unit_price, q.min_charge),
            (None, None) => {
                return Err(RepoError::Validation(format!(
                    "No pricing rule for service {} / category {} and no price override given",
                    item.service_type_id, item.laundry_category_id
                )));
            }
        };
        money::validate_line(item.quantity, unit_price)
            .map_err(|e| RepoError::Validation(e.to_string()))?;
        priced.push(PricedItem {
            service_type_id: item.service_type_id,
            laundry_category_id: item.laundry_category_id,
            description: item.description.clone(),
            quantity: item.quantity,
            unit_price,
            line_total: money::line_total(item.quantity, unit_price, min_charge),
        });
    }

    let line_totals: Vec<f64> = priced.iter().map(|p| p.line_total).collect();
    let discount_type = data.discount_type.unwrap_or(DiscountType::None);
    let discount_value = data.discount_value.unwrap_or(0.0);
    let totals = money::compute_totals(&line_totals, discount_type, discount_value)
        .map_err(|e| RepoError::Validation(e.to_string()))?;

    let amount_paid = match &data.initial_payment {
        Some(p) => {
            if p.amount > totals.total_amount + money::MONEY_TOLERANCE {
                return Err(RepoError::BusinessRule(format!(
                    "Initial payment {} exceeds order total {}",
                    p.amount, totals.total_amount
                )));
            }
            money::round2(p.amount)
        }
        None => 0.0,
    };
    let (amount_due, payment_status) =
        money::derive_payment_status(totals.total_amount, amount_paid);

    let now = shared::util::now_millis();
    let order_id = shared::util::snowflake_id();

    // UNIQUE(order_number) can collide on the random suffix; retry once
    let mut order_number = shared::util::order_number();
    let mut tx = pool.begin().await?;
    for attempt in 0..2 {
        let result = sqlx::query(
            "INSERT INTO orders (id, order_number, customer_id, branch_id, status, subtotal, \
             discount_type, discount_value, total_amount, amount_paid, amount_due, \
             payment_status, notes, pickup_date, created_by, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?16)",
        )
        .bind(order_id)
        .bind(&order_number)
        .bind(data.customer_id)
        .bind(data.branch_id)
        .bind(OrderStatus::Received)
        .bind(totals.subtotal)
        .bind(discount_type)
        .bind(discount_value)
        .bind(totals.total_amount)
        .bind(amount_paid)
        .bind(amount_due)
        .bind(payment_status)
        .bind(&data.notes)
        .bind(data.pickup_date)
        .bind(created_by)
        .bind(now)
        .execute(&mut *tx)
        .await;

        match result {
            Ok(_) => break,
            Err(e) => {
                let repo_err = RepoError::from(e);
                if matches!(repo_err, RepoError::Duplicate(_)) && attempt == 0 {
                    order_number = shared::util::order_number();
                    continue;
                }
                return Err(repo_err);
            }
        }
    }

    for p in &priced {
        sqlx::query(
            "INSERT INTO order_item (id, order_id, service_type_id, laundry_category_id, \
             description, quantity, unit_price, line_total) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(shared::util::snowflake_id())
        .bind(order_id)
        .bind(p.service_type_id)
        .bind(p.laundry_category_id)
        .bind(&p.description)
        .bind(p.quantity)
        .bind(p.unit_price)
        .bind(p.line_total)
        .execute(&mut *tx)
        .await?;
    }

    if let Some(p) = &data.initial_payment
        && amount_paid > 0.0
    {
        sqlx::query(
            "INSERT INTO payment (id, order_id, amount, method, reference, received_by, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(shared::util::snowflake_id())
        .bind(order_id)
        .bind(amount_paid)
        .bind(p.method)
        .bind(&p.reference)
        .bind(created_by)
        .bind(now)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    find_detail(pool, order_id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create order".into()))
}

/// Update status, notes, pickup date or discount.
///
/// Cancelled orders are immutable. Discount changes recompute the total and
/// re-derive `amount_due`/`payment_status` against the amount already paid.
pub async fn update(pool: &SqlitePool, id: i64, data: OrderUpdate) -> RepoResult<Order> {
    let current = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {id} not found")))?;

    if current.status == OrderStatus::Cancelled {
        return Err(RepoError::BusinessRule(
            "Cancelled orders cannot be modified".into(),
        ));
    }

    let discount_changed = data.discount_type.is_some() || data.discount_value.is_some();
    let discount_type = data.discount_type.unwrap_or(current.discount_type);
    let discount_value = data.discount_value.unwrap_or(current.discount_value);

    let (subtotal, total_amount, amount_due, payment_status) = if discount_changed {
        let totals = money::compute_totals(&[current.subtotal], discount_type, discount_value)
            .map_err(|e| RepoError::Validation(e.to_string()))?;
        if totals.total_amount + money::MONEY_TOLERANCE < current.amount_paid {
            return Err(RepoError::BusinessRule(format!(
                "Discount would drop the total below the {} already paid",
                current.amount_paid
            )));
        }
        let (due, status) =
            money::derive_payment_status(totals.total_amount, current.amount_paid);
        (totals.subtotal, totals.total_amount, due, status)
    } else {
        (
            current.subtotal,
            current.total_amount,
            current.amount_due,
            current.payment_status,
        )
    };

    let status = data.status.unwrap_or(current.status);
    let now = shared::util::now_millis();

    sqlx::query(
        "UPDATE orders SET status = ?1, discount_type = ?2, discount_value = ?3, subtotal = ?4, \
         total_amount = ?5, amount_due = ?6, payment_status = ?7, notes = COALESCE(?8, notes), \
         pickup_date = COALESCE(?9, pickup_date), updated_at = ?10 WHERE id = ?11",
    )
    .bind(status)
    .bind(discount_type)
    .bind(discount_value)
    .bind(subtotal)
    .bind(total_amount)
    .bind(amount_due)
    .bind(payment_status)
    .bind(&data.notes)
    .bind(data.pickup_date)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {id} not found")))
}
