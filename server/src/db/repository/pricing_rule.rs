//! Pricing Rule Repository

use super::{RepoError, RepoResult};
use shared::models::{PriceQuote, PricingRule, PricingRuleCreate, PricingRuleUpdate};
use sqlx::SqlitePool;

const RULE_SELECT: &str = "SELECT id, service_type_id, laundry_category_id, unit_price, \
     min_charge, is_active, created_at, updated_at FROM pricing_rule";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<PricingRule>> {
    let sql = format!("{RULE_SELECT} WHERE is_active = 1 ORDER BY created_at");
    let rows = sqlx::query_as::<_, PricingRule>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<PricingRule>> {
    let sql = format!("{RULE_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, PricingRule>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Resolve the active rule for a (service type, laundry category) pair.
pub async fn quote(
    pool: &SqlitePool,
    service_type_id: i64,
    laundry_category_id: i64,
) -> RepoResult<Option<PriceQuote>> {
    let sql = format!(
        "{RULE_SELECT} WHERE service_type_id = ? AND laundry_category_id = ? AND is_active = 1"
    );
    let rule = sqlx::query_as::<_, PricingRule>(&sql)
        .bind(service_type_id)
        .bind(laundry_category_id)
        .fetch_optional(pool)
        .await?;
    Ok(rule.map(|r| PriceQuote {
        service_type_id: r.service_type_id,
        laundry_category_id: r.laundry_category_id,
        unit_price: r.unit_price,
        min_charge: r.min_charge,
    }))
}

pub async fn create(pool: &SqlitePool, data: PricingRuleCreate) -> RepoResult<PricingRule> {
    // Referenced catalog rows must exist and be active
    let service_exists: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM service_type WHERE id = ? AND is_active = 1")
            .bind(data.service_type_id)
            .fetch_one(pool)
            .await?;
    if service_exists == 0 {
        return Err(RepoError::Validation(format!(
            "Service type {} does not exist",
            data.service_type_id
        )));
    }
    let category_exists: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM laundry_category WHERE id = ? AND is_active = 1")
            .bind(data.laundry_category_id)
            .fetch_one(pool)
            .await?;
    if category_exists == 0 {
        return Err(RepoError::Validation(format!(
            "Laundry category {} does not exist",
            data.laundry_category_id
        )));
    }

    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO pricing_rule (id, service_type_id, laundry_category_id, unit_price, \
         min_charge, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6, ?6)",
    )
    .bind(id)
    .bind(data.service_type_id)
    .bind(data.laundry_category_id)
    .bind(data.unit_price)
    .bind(data.min_charge.unwrap_or(0.0))
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| match RepoError::from(e) {
        RepoError::Duplicate(_) => RepoError::Duplicate(
            "An active pricing rule for this service and category already exists".into(),
        ),
        other => other,
    })?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create pricing rule".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: PricingRuleUpdate) -> RepoResult<PricingRule> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE pricing_rule SET unit_price = COALESCE(?1, unit_price), \
         min_charge = COALESCE(?2, min_charge), is_active = COALESCE(?3, is_active), \
         updated_at = ?4 WHERE id = ?5",
    )
    .bind(data.unit_price)
    .bind(data.min_charge)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| match RepoError::from(e) {
        RepoError::Duplicate(_) => RepoError::Duplicate(
            "An active pricing rule for this service and category already exists".into(),
        ),
        other => other,
    })?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Pricing rule {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Pricing rule {id} not found")))
}

/// Soft delete
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE pricing_rule SET is_active = 0, updated_at = ? WHERE id = ? AND is_active = 1",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}
