//! Password Reset Token Repository
//!
//! Raw tokens never touch the database; only their SHA-256 digest is
//! stored. Tokens are single-use and expire.

use super::{RepoError, RepoResult};
use sha2::{Digest, Sha256};
use sqlx::SqlitePool;

/// Token lifetime: 1 hour
pub const TOKEN_TTL_MS: i64 = 60 * 60 * 1000;

fn digest(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Generate and persist a reset token for the user; returns the raw token.
pub async fn issue(pool: &SqlitePool, user_id: i64) -> RepoResult<String> {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    // Scope the non-Send ThreadRng so it is dropped before any `.await`,
    // keeping this async fn's future `Send`.
    let raw: String = {
        let mut rng = rand::thread_rng();
        (0..48)
            .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
            .collect()
    };

    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO password_reset_token (id, user_id, token_hash, expires_at, used, created_at) \
         VALUES (?1, ?2, ?3, ?4, 0, ?5)",
    )
    .bind(shared::util::snowflake_id())
    .bind(user_id)
    .bind(digest(&raw))
    .bind(now + TOKEN_TTL_MS)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(raw)
}

/// Consume a token: marks it used and returns the owning user id.
///
/// Fails when the token is unknown, already used, or expired.
pub async fn consume(pool: &SqlitePool, raw_token: &str) -> RepoResult<i64> {
    let now = shared::util::now_millis();
    let hash = digest(raw_token);

    let mut tx = pool.begin().await?;

    let row: Option<(i64, i64, bool)> = sqlx::query_as(
        "SELECT user_id, expires_at, used FROM password_reset_token WHERE token_hash = ?",
    )
    .bind(&hash)
    .fetch_optional(&mut *tx)
    .await?;

    let (user_id, expires_at, used) =
        row.ok_or_else(|| RepoError::Validation("Invalid or expired reset token".into()))?;

    if used || expires_at < now {
        return Err(RepoError::Validation("Invalid or expired reset token".into()));
    }

    sqlx::query("UPDATE password_reset_token SET used = 1 WHERE token_hash = ?")
        .bind(&hash)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(user_id)
}

/// Drop expired tokens; returns how many were removed.
pub async fn purge_expired(pool: &SqlitePool) -> RepoResult<u64> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("DELETE FROM password_reset_token WHERE expires_at < ?")
        .bind(now)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected())
}
