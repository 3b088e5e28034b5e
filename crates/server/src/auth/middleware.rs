use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use sqlx::{Pool, Postgres};

use super::cookies::{self, CookieSlot, PendingCookieAction};
use super::jwt::{self, hash_token, validate_access_token, validate_refresh_token, TokenSubject};

/// Permissive auth middleware.
///
/// Puts validated [`jwt::Claims`] into request extensions (refreshing the
/// pair transparently when only the refresh cookie is still valid), installs
/// a [`CookieSlot`] for server functions, and applies whatever cookie change
/// they scheduled. Never rejects a request; server functions decide.
pub async fn auth_middleware(
    State(pool): State<Pool<Postgres>>,
    mut req: Request,
    next: Next,
) -> Response {
    let headers = req.headers().clone();

    let claims = cookies::extract_access_token(&headers)
        .and_then(|token| validate_access_token(&token).ok());

    let refreshed = match claims {
        Some(claims) => {
            req.extensions_mut().insert(claims);
            None
        }
        None => match cookies::extract_refresh_token(&headers) {
            Some(refresh_token) => rotate_refresh_token(&pool, &refresh_token, &mut req).await,
            None => None,
        },
    };

    let cookie_slot = CookieSlot::default();
    req.extensions_mut().insert(cookie_slot.clone());

    let mut response = next.run(req).await;

    if let Some((access, refresh)) = refreshed {
        cookies::set_auth_cookies(response.headers_mut(), &access, &refresh);
    }

    match cookie_slot.take() {
        Some(PendingCookieAction::Set {
            access_token,
            refresh_token,
        }) => cookies::set_auth_cookies(response.headers_mut(), &access_token, &refresh_token),
        Some(PendingCookieAction::Clear) => cookies::clear_auth_cookies(response.headers_mut()),
        None => {}
    }

    response
}

/// Exchange a stored, unrevoked refresh token for a new pair.
///
/// The old token is revoked; the fresh access claims go into `req`.
async fn rotate_refresh_token(
    pool: &Pool<Postgres>,
    refresh_token: &str,
    req: &mut Request,
) -> Option<(String, String)> {
    let claims = validate_refresh_token(refresh_token).ok()?;

    let revoked = sqlx::query_scalar::<_, i64>(
        "UPDATE refresh_tokens SET revoked = TRUE \
         WHERE token_hash = $1 AND user_id = $2 AND revoked = FALSE AND expires_at > NOW() \
         RETURNING id",
    )
    .bind(hash_token(refresh_token))
    .bind(claims.sub)
    .fetch_optional(pool)
    .await
    .map_err(|e| tracing::error!(error = %e, "refresh token lookup failed"))
    .ok()
    .flatten();

    if revoked.is_none() {
        tracing::debug!(user_id = claims.sub, "refresh token unknown or revoked");
        return None;
    }

    let subject = TokenSubject::from(&claims);
    let new_access = jwt::create_access_token(subject).ok()?;
    let (new_refresh, expires_at) = jwt::create_refresh_token(subject).ok()?;

    if let Err(e) = super::store_refresh_token(pool, claims.sub, &new_refresh, expires_at).await {
        tracing::error!(user_id = claims.sub, error = %e, "failed to store rotated refresh token");
        return None;
    }

    let new_claims = validate_access_token(&new_access).ok()?;
    tracing::debug!(user_id = new_claims.sub, "session refreshed");
    req.extensions_mut().insert(new_claims);

    Some((new_access, new_refresh))
}
