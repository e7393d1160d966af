//! Expense Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Expense category entity (支出类别)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ExpenseCategory {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create expense category payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ExpenseCategoryCreate {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

/// Update expense category payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ExpenseCategoryUpdate {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

/// Expense entity (支出记录)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Expense {
    pub id: i64,
    pub expense_category_id: i64,
    pub branch_id: i64,
    pub description: String,
    pub amount: f64,
    /// Business date the cost was incurred (YYYY-MM-DD)
    pub incurred_on: String,
    pub recorded_by: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Expense joined with its category name (list view)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ExpenseWithCategory {
    pub id: i64,
    pub expense_category_id: i64,
    pub category_name: String,
    pub branch_id: i64,
    pub description: String,
    pub amount: f64,
    pub incurred_on: String,
    pub recorded_by: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create expense payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ExpenseCreate {
    pub expense_category_id: i64,
    pub branch_id: i64,
    #[validate(length(min = 1, max = 500))]
    pub description: String,
    #[validate(range(min = 0.01, max = 1_000_000.0))]
    pub amount: f64,
    /// YYYY-MM-DD
    pub incurred_on: String,
}

/// Update expense payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ExpenseUpdate {
    pub expense_category_id: Option<i64>,
    #[validate(length(min = 1, max = 500))]
    pub description: Option<String>,
    #[validate(range(min = 0.01, max = 1_000_000.0))]
    pub amount: Option<f64>,
    pub incurred_on: Option<String>,
}
