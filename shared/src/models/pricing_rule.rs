//! Pricing Rule Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Pricing rule entity (价格规则)
///
/// Maps a (service type, laundry category) pair to a unit price. The pair
/// is unique among active rules; order intake resolves item prices here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PricingRule {
    pub id: i64,
    pub service_type_id: i64,
    pub laundry_category_id: i64,
    /// Price per unit (kg or item, depending on the service type)
    pub unit_price: f64,
    /// Minimum charge applied to the line total (0 = none)
    pub min_charge: f64,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create pricing rule payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PricingRuleCreate {
    pub service_type_id: i64,
    pub laundry_category_id: i64,
    #[validate(range(min = 0.0, max = 1_000_000.0))]
    pub unit_price: f64,
    #[validate(range(min = 0.0, max = 1_000_000.0))]
    pub min_charge: Option<f64>,
}

/// Update pricing rule payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PricingRuleUpdate {
    #[validate(range(min = 0.0, max = 1_000_000.0))]
    pub unit_price: Option<f64>,
    #[validate(range(min = 0.0, max = 1_000_000.0))]
    pub min_charge: Option<f64>,
    pub is_active: Option<bool>,
}

/// Price quote for a (service type, laundry category) pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceQuote {
    pub service_type_id: i64,
    pub laundry_category_id: i64,
    pub unit_price: f64,
    pub min_charge: f64,
}
