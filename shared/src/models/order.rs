//! Order Model

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::payment::{Payment, PaymentMethod};

/// Order lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum OrderStatus {
    Received,
    Processing,
    Ready,
    Delivered,
    Cancelled,
}

/// Order-level discount type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum DiscountType {
    None,
    Percentage,
    FixedAmount,
}

/// Derived payment status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum PaymentStatus {
    Unpaid,
    Partial,
    Paid,
}

/// Order entity (洗衣订单)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub order_number: String,
    pub customer_id: i64,
    pub branch_id: i64,
    pub status: OrderStatus,
    pub subtotal: f64,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    pub total_amount: f64,
    pub amount_paid: f64,
    /// Always total_amount - amount_paid
    pub amount_due: f64,
    pub payment_status: PaymentStatus,
    pub notes: Option<String>,
    /// Agreed pickup date (Unix millis)
    pub pickup_date: Option<i64>,
    pub created_by: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Order item entity (订单明细行)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub service_type_id: i64,
    pub laundry_category_id: i64,
    pub description: Option<String>,
    /// Fractional for kg-based services
    pub quantity: f64,
    pub unit_price: f64,
    pub line_total: f64,
}

/// Order item input for create
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderItemInput {
    pub service_type_id: i64,
    pub laundry_category_id: i64,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(range(min = 0.001, max = 9999.0))]
    pub quantity: f64,
    /// Overrides the pricing-rule price when present
    #[validate(range(min = 0.0, max = 1_000_000.0))]
    pub unit_price: Option<f64>,
}

/// Initial payment recorded together with order creation
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct InitialPayment {
    #[validate(range(min = 0.01, max = 1_000_000.0))]
    pub amount: f64,
    pub method: PaymentMethod,
    #[validate(length(max = 100))]
    pub reference: Option<String>,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderCreate {
    pub customer_id: i64,
    pub branch_id: i64,
    #[validate(nested, length(min = 1))]
    pub items: Vec<OrderItemInput>,
    pub discount_type: Option<DiscountType>,
    #[validate(range(min = 0.0))]
    pub discount_value: Option<f64>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
    pub pickup_date: Option<i64>,
    #[validate(nested)]
    pub initial_payment: Option<InitialPayment>,
}

/// Update order payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderUpdate {
    pub status: Option<OrderStatus>,
    pub discount_type: Option<DiscountType>,
    #[validate(range(min = 0.0))]
    pub discount_value: Option<f64>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
    pub pickup_date: Option<i64>,
}

/// Order with customer name, items and payments (detail view)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderWithDetails {
    #[serde(flatten)]
    pub order: Order,
    pub customer_name: String,
    pub items: Vec<OrderItem>,
    pub payments: Vec<Payment>,
}
