//! Laundry Category Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Laundry category entity (衣物类别，如衣物、床品、窗帘)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct LaundryCategory {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create laundry category payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LaundryCategoryCreate {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

/// Update laundry category payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LaundryCategoryUpdate {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    pub is_active: Option<bool>,
}
