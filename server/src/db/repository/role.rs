//! Role Repository
//!
//! Roles are seeded by migration and read-only at runtime; the permission
//! defaults live in `auth::permissions`.

use super::RepoResult;
use shared::models::Role;
use sqlx::SqlitePool;

const ROLE_SELECT: &str =
    "SELECT id, name, description, permissions, is_system, is_active FROM role";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Role>> {
    let sql = format!("{ROLE_SELECT} WHERE is_active = 1 ORDER BY id");
    let rows = sqlx::query_as::<_, Role>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_name(pool: &SqlitePool, name: &str) -> RepoResult<Option<Role>> {
    let sql = format!("{ROLE_SELECT} WHERE name = ?");
    let row = sqlx::query_as::<_, Role>(&sql)
        .bind(name)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}
