pub mod cookies;
pub mod jwt;
pub mod middleware;
pub mod password;

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

/// Persist the hash of a freshly issued refresh token.
pub async fn store_refresh_token(
    db: &Pool<Postgres>,
    user_id: i64,
    raw_token: &str,
    expires_at: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO refresh_tokens (user_id, token_hash, expires_at) VALUES ($1, $2, $3)")
        .bind(user_id)
        .bind(jwt::hash_token(raw_token))
        .bind(expires_at)
        .execute(db)
        .await?;
    Ok(())
}

/// Revoke every live refresh token of a user (logout).
pub async fn revoke_refresh_tokens(db: &Pool<Postgres>, user_id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE refresh_tokens SET revoked = TRUE WHERE user_id = $1 AND revoked = FALSE",
    )
    .bind(user_id)
    .execute(db)
    .await?;
    Ok(result.rows_affected())
}

/// Delete refresh tokens that expired or were revoked more than a day ago.
pub async fn purge_stale_refresh_tokens(db: &Pool<Postgres>) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "DELETE FROM refresh_tokens \
         WHERE expires_at < NOW() - INTERVAL '1 day' \
            OR (revoked = TRUE AND created_at < NOW() - INTERVAL '1 day')",
    )
    .execute(db)
    .await?;
    Ok(result.rows_affected())
}
