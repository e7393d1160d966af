//! Branch Repository

use super::{RepoError, RepoResult};
use shared::models::{Branch, BranchCreate, BranchUpdate};
use sqlx::SqlitePool;

const BRANCH_SELECT: &str =
    "SELECT id, name, address, phone, is_active, created_at, updated_at FROM branch";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Branch>> {
    let sql = format!("{BRANCH_SELECT} WHERE is_active = 1 ORDER BY created_at");
    let rows = sqlx::query_as::<_, Branch>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Branch>> {
    let sql = format!("{BRANCH_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Branch>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn count_active(pool: &SqlitePool) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM branch WHERE is_active = 1")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn create(pool: &SqlitePool, data: BranchCreate) -> RepoResult<Branch> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO branch (id, name, address, phone, is_active, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, 1, ?5, ?5)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.address)
    .bind(&data.phone)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create branch".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: BranchUpdate) -> RepoResult<Branch> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE branch SET name = COALESCE(?1, name), address = COALESCE(?2, address), \
         phone = COALESCE(?3, phone), is_active = COALESCE(?4, is_active), updated_at = ?5 \
         WHERE id = ?6",
    )
    .bind(&data.name)
    .bind(&data.address)
    .bind(&data.phone)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Branch {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Branch {id} not found")))
}

/// Soft delete. Fails while users, customers or orders still reference the branch.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let user_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM user WHERE branch_id = ? AND is_active = 1")
            .bind(id)
            .fetch_one(pool)
            .await?;
    if user_count > 0 {
        return Err(RepoError::BusinessRule(format!(
            "Cannot delete branch: {user_count} active user(s) assigned"
        )));
    }

    let customer_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM customer WHERE branch_id = ? AND is_active = 1")
            .bind(id)
            .fetch_one(pool)
            .await?;
    if customer_count > 0 {
        return Err(RepoError::BusinessRule(format!(
            "Cannot delete branch: {customer_count} active customer(s) assigned"
        )));
    }

    let order_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE branch_id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;
    if order_count > 0 {
        return Err(RepoError::BusinessRule(format!(
            "Cannot delete branch: {order_count} order(s) recorded against it"
        )));
    }

    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE branch SET is_active = 0, updated_at = ? WHERE id = ? AND is_active = 1")
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
