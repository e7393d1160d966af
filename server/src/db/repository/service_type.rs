//! Service Type Repository

use super::{RepoError, RepoResult};
use shared::models::{ServiceType, ServiceTypeCreate, ServiceTypeUpdate};
use sqlx::SqlitePool;

const SERVICE_TYPE_SELECT: &str =
    "SELECT id, name, description, unit, is_active, created_at, updated_at FROM service_type";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<ServiceType>> {
    let sql = format!("{SERVICE_TYPE_SELECT} WHERE is_active = 1 ORDER BY created_at");
    let rows = sqlx::query_as::<_, ServiceType>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<ServiceType>> {
    let sql = format!("{SERVICE_TYPE_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, ServiceType>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: ServiceTypeCreate) -> RepoResult<ServiceType> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO service_type (id, name, description, unit, is_active, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, 1, ?5, ?5)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.unit)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create service type".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: ServiceTypeUpdate) -> RepoResult<ServiceType> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE service_type SET name = COALESCE(?1, name), description = COALESCE(?2, description), \
         unit = COALESCE(?3, unit), is_active = COALESCE(?4, is_active), updated_at = ?5 WHERE id = ?6",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.unit)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Service type {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Service type {id} not found")))
}

/// Soft delete. Blocked while pricing rules or order items reference the service.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rule_count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM pricing_rule WHERE service_type_id = ? AND is_active = 1",
    )
    .bind(id)
    .fetch_one(pool)
    .await?;
    if rule_count > 0 {
        return Err(RepoError::BusinessRule(format!(
            "Cannot delete service type: {rule_count} active pricing rule(s) reference it"
        )));
    }

    let item_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM order_item WHERE service_type_id = ?")
            .bind(id)
            .fetch_one(pool)
            .await?;
    if item_count > 0 {
        return Err(RepoError::BusinessRule(format!(
            "Cannot delete service type: referenced by {item_count} order item(s)"
        )));
    }

    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE service_type SET is_active = 0, updated_at = ? WHERE id = ? AND is_active = 1",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}
