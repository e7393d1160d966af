//! User Repository

use super::{RepoError, RepoResult};
use shared::models::{User, UserCreate, UserUpdate};
use sqlx::SqlitePool;

use crate::auth::hash_password;

const USER_SELECT: &str = "SELECT id, username, display_name, email, password_hash, role, \
     branch_id, is_active, banned, ban_reason, created_at, updated_at FROM user";

pub async fn find_all(pool: &SqlitePool, include_inactive: bool) -> RepoResult<Vec<User>> {
    let sql = if include_inactive {
        format!("{USER_SELECT} ORDER BY created_at")
    } else {
        format!("{USER_SELECT} WHERE is_active = 1 ORDER BY created_at")
    };
    let rows = sqlx::query_as::<_, User>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE email = ?");
    let row = sqlx::query_as::<_, User>(&sql)
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn create(pool: &SqlitePool, data: UserCreate) -> RepoResult<User> {
    let password_hash = hash_password(&data.password)
        .map_err(|e| RepoError::Database(format!("Hashing failed: {e}")))?;
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO user (id, username, display_name, email, password_hash, role, branch_id, \
         is_active, banned, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1, 0, ?8, ?8)",
    )
    .bind(id)
    .bind(&data.username)
    .bind(&data.display_name)
    .bind(&data.email)
    .bind(&password_hash)
    .bind(&data.role)
    .bind(data.branch_id)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: UserUpdate) -> RepoResult<User> {
    let password_hash = match &data.password {
        Some(p) => Some(
            hash_password(p).map_err(|e| RepoError::Database(format!("Hashing failed: {e}")))?,
        ),
        None => None,
    };
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE user SET display_name = COALESCE(?1, display_name), email = COALESCE(?2, email), \
         password_hash = COALESCE(?3, password_hash), branch_id = COALESCE(?4, branch_id), \
         is_active = COALESCE(?5, is_active), updated_at = ?6 WHERE id = ?7",
    )
    .bind(&data.display_name)
    .bind(&data.email)
    .bind(&password_hash)
    .bind(data.branch_id)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("User {id} not found")))
}

/// Replace the user's role. Idempotent: setting the current role again is a
/// no-op; a user holds exactly one role at a time.
pub async fn set_role(pool: &SqlitePool, id: i64, role: &str) -> RepoResult<User> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE user SET role = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(role)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("User {id} not found")))
}

pub async fn set_banned(
    pool: &SqlitePool,
    id: i64,
    banned: bool,
    reason: Option<String>,
) -> RepoResult<User> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE user SET banned = ?1, ban_reason = ?2, updated_at = ?3 WHERE id = ?4",
    )
    .bind(banned)
    .bind(&reason)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("User {id} not found")))
}

pub async fn set_password_hash(pool: &SqlitePool, id: i64, hash: &str) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE user SET password_hash = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(hash)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id} not found")));
    }
    Ok(())
}

/// Soft delete
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE user SET is_active = 0, updated_at = ? WHERE id = ? AND is_active = 1")
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
