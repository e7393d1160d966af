//! Laundry Category Repository

use super::{RepoError, RepoResult};
use shared::models::{LaundryCategory, LaundryCategoryCreate, LaundryCategoryUpdate};
use sqlx::SqlitePool;

const CATEGORY_SELECT: &str =
    "SELECT id, name, description, is_active, created_at, updated_at FROM laundry_category";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<LaundryCategory>> {
    let sql = format!("{CATEGORY_SELECT} WHERE is_active = 1 ORDER BY created_at");
    let rows = sqlx::query_as::<_, LaundryCategory>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<LaundryCategory>> {
    let sql = format!("{CATEGORY_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, LaundryCategory>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: LaundryCategoryCreate) -> RepoResult<LaundryCategory> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO laundry_category (id, name, description, is_active, created_at, updated_at) \
         VALUES (?1, ?2, ?3, 1, ?4, ?4)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.description)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create laundry category".into()))
}

pub async fn update(
    pool: &SqlitePool,
    id: i64,
    data: LaundryCategoryUpdate,
) -> RepoResult<LaundryCategory> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE laundry_category SET name = COALESCE(?1, name), \
         description = COALESCE(?2, description), is_active = COALESCE(?3, is_active), \
         updated_at = ?4 WHERE id = ?5",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Laundry category {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Laundry category {id} not found")))
}

/// Soft delete. Blocked while pricing rules or order items reference the category.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rule_count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM pricing_rule WHERE laundry_category_id = ? AND is_active = 1",
    )
    .bind(id)
    .fetch_one(pool)
    .await?;
    if rule_count > 0 {
        return Err(RepoError::BusinessRule(format!(
            "Cannot delete laundry category: {rule_count} active pricing rule(s) reference it"
        )));
    }

    let item_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM order_item WHERE laundry_category_id = ?")
            .bind(id)
            .fetch_one(pool)
            .await?;
    if item_count > 0 {
        return Err(RepoError::BusinessRule(format!(
            "Cannot delete laundry category: referenced by {item_count} order item(s)"
        )));
    }

    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE laundry_category SET is_active = 0, updated_at = ? WHERE id = ? AND is_active = 1",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}
