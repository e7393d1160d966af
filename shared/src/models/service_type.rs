//! Service Type Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Billing unit for a service
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum ServiceUnit {
    /// Priced per kilogram (wash & fold)
    Kg,
    /// Priced per piece (dry cleaning, ironing)
    Item,
}

/// Service type entity (洗衣服务，如水洗、干洗、熨烫)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ServiceType {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub unit: ServiceUnit,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create service type payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServiceTypeCreate {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    pub unit: ServiceUnit,
}

/// Update service type payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServiceTypeUpdate {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    pub unit: Option<ServiceUnit>,
    pub is_active: Option<bool>,
}
