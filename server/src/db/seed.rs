//! First-run seeding
//!
//! Creates a default branch and admin account when the database is empty so
//! a fresh install is immediately usable.

use sqlx::SqlitePool;

use crate::auth::hash_password;
use crate::core::Config;
use crate::db::repository::{RepoResult, branch, user};
use shared::models::BranchCreate;

/// Seed defaults on an empty database. Idempotent: does nothing once a
/// branch or user exists.
pub async fn ensure_defaults(pool: &SqlitePool, config: &Config) -> RepoResult<()> {
    if branch::count_active(pool).await? == 0 {
        let b = branch::create(
            pool,
            BranchCreate {
                name: "Main Branch".to_string(),
                address: None,
                phone: None,
            },
        )
        .await?;
        tracing::info!(branch_id = b.id, "Seeded default branch");
    }

    if user::count(pool).await? == 0 {
        let password = config.admin_password.clone().unwrap_or_else(|| {
            let generated = crate::auth::jwt::generate_printable_jwt_secret()[..16].to_string();
            tracing::warn!(
                "ADMIN_PASSWORD not set; generated admin password: {generated}"
            );
            generated
        });
        let password_hash = hash_password(&password)
            .map_err(|e| crate::db::repository::RepoError::Database(e.to_string()))?;

        let now = shared::util::now_millis();
        let id = shared::util::snowflake_id();
        sqlx::query(
            "INSERT INTO user (id, username, display_name, email, password_hash, role, \
             is_active, banned, created_at, updated_at) \
             VALUES (?1, 'admin', 'Administrator', ?2, ?3, 'admin', 1, 0, ?4, ?4)",
        )
        .bind(id)
        .bind(&config.admin_email)
        .bind(&password_hash)
        .bind(now)
        .execute(pool)
        .await?;
        tracing::info!(user_id = id, email = %config.admin_email, "Seeded admin account");
    }

    Ok(())
}
