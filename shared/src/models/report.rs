//! Report Models
//!
//! Plain rows assembled by the report query layer for chart components.

use serde::{Deserialize, Serialize};

/// Dashboard summary for a date range
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub revenue: f64,
    pub collected: f64,
    pub outstanding: f64,
    pub order_count: i64,
    pub expense_total: f64,
    pub net: f64,
}

/// One revenue bucket (day or month)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct RevenuePoint {
    /// Bucket label: YYYY-MM-DD or YYYY-MM
    pub bucket: String,
    pub revenue: f64,
    pub collected: f64,
    pub order_count: i64,
}

/// Expense total grouped by category
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ExpenseByCategory {
    pub category_name: String,
    pub total: f64,
    pub count: i64,
}

/// Payment totals grouped by method
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PaymentMethodBreakdown {
    pub method: String,
    pub total: f64,
    pub count: i64,
}

/// Revenue/quantity by service type
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TopService {
    pub service_type_id: i64,
    pub service_name: String,
    pub revenue: f64,
    pub quantity: f64,
}
