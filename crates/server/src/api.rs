use dioxus::prelude::*;
use shared_types::{
    ClientSummary, DashboardStats, DateRange, FeatureFlags, ReportData, ReportKind, Session,
    UserSummary,
};

#[cfg(feature = "server")]
use crate::db::get_db;

#[cfg(feature = "server")]
use crate::error_convert::{AppErrorExt, SqlxErrorExt, ValidateRequest};

#[cfg(feature = "server")]
use shared_types::{AppError, Role};

// ── Auth helpers for server functions ──────────────────

/// Claims of the caller, as validated by the auth middleware.
/// Falls back to parsing the access token when the middleware did not run.
#[cfg(feature = "server")]
fn require_auth() -> Result<crate::auth::jwt::Claims, ServerFnError> {
    use crate::auth::{cookies, jwt};

    let ctx = dioxus::fullstack::FullstackContext::current()
        .ok_or_else(|| AppError::unauthorized("Authentication required").into_server_fn_error())?;

    let parts = ctx.parts_mut();

    if let Some(claims) = parts.extensions.get::<jwt::Claims>() {
        return Ok(claims.clone());
    }

    let token = cookies::extract_access_token(&parts.headers)
        .ok_or_else(|| AppError::unauthorized("Authentication required").into_server_fn_error())?;

    jwt::validate_access_token(&token)
        .map_err(|_| AppError::unauthorized("Invalid or expired token").into_server_fn_error())
}

/// Claims of the caller plus their parsed role, if it is one of `allowed`.
///
/// A token carrying a tag that is not a known role is treated as no session.
#[cfg(feature = "server")]
fn require_role(allowed: &[Role]) -> Result<(crate::auth::jwt::Claims, Role), ServerFnError> {
    let claims = require_auth()?;
    let Some(role) = Role::parse(&claims.role) else {
        tracing::warn!(user_id = claims.sub, role = %claims.role, "token carries unknown role");
        return Err(AppError::unauthorized("Authentication required").into_server_fn_error());
    };
    if !allowed.contains(&role) {
        let needed: Vec<&str> = allowed.iter().map(Role::as_str).collect();
        tracing::warn!(user_id = claims.sub, role = role.as_str(), ?needed, "role rejected");
        return Err(
            AppError::forbidden(format!("Requires role: {}", needed.join(" or ")))
                .into_server_fn_error(),
        );
    }
    Ok((claims, role))
}

#[cfg(feature = "server")]
#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    display_name: String,
    email: String,
    role: String,
}

#[cfg(feature = "server")]
impl From<UserRow> for Session {
    fn from(row: UserRow) -> Self {
        Session {
            user_id: row.id,
            username: row.username,
            display_name: row.display_name,
            email: row.email,
            role: row.role,
        }
    }
}

/// Get the current feature flags. Flags are not sensitive.
#[server]
pub async fn get_feature_flags() -> Result<FeatureFlags, ServerFnError> {
    Ok(crate::config::feature_flags().clone())
}

// ── Session ────────────────────────────────────────────

/// Verify credentials, issue a token pair and schedule the auth cookies.
#[cfg_attr(feature = "server", tracing::instrument(skip(password)))]
#[server]
pub async fn login(email: String, password: String) -> Result<Session, ServerFnError> {
    use crate::auth::{cookies, jwt, password as pw, store_refresh_token};
    use shared_types::LoginRequest;

    let email = email.trim().to_lowercase();
    LoginRequest {
        email: email.clone(),
        password: password.clone(),
    }
    .validate_request()
    .map_err(|e| e.into_server_fn_error())?;

    let db = get_db().map_err(AppErrorExt::into_server_fn_error)?;
    let row: Option<(i64, String)> =
        sqlx::query_as("SELECT id, password_hash FROM users WHERE email = $1")
            .bind(&email)
            .fetch_optional(db)
            .await
            .map_err(|e| e.into_app_error().into_server_fn_error())?;

    let Some((user_id, password_hash)) = row else {
        tracing::info!("login for unknown email");
        return Err(AppError::unauthorized("Invalid email or password").into_server_fn_error());
    };

    let valid = pw::verify_password(&password, &password_hash)
        .map_err(|e| AppError::internal(e.to_string()).into_server_fn_error())?;
    if !valid {
        tracing::info!(user_id, "login with wrong password");
        return Err(AppError::unauthorized("Invalid email or password").into_server_fn_error());
    }

    let user: UserRow = sqlx::query_as(
        "SELECT id, username, display_name, email, role FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_one(db)
    .await
    .map_err(|e| e.into_app_error().into_server_fn_error())?;

    if Role::parse(&user.role).is_none() {
        tracing::warn!(user_id, role = %user.role, "account has no console role");
        return Err(
            AppError::forbidden("This account has no access to the console").into_server_fn_error(),
        );
    }

    let subject = jwt::TokenSubject {
        user_id: user.id,
        email: &user.email,
        role: &user.role,
    };
    let access_token = jwt::create_access_token(subject)
        .map_err(|e| AppError::internal(e.to_string()).into_server_fn_error())?;
    let (refresh_token, expires_at) = jwt::create_refresh_token(subject)
        .map_err(|e| AppError::internal(e.to_string()).into_server_fn_error())?;

    store_refresh_token(db, user.id, &refresh_token, expires_at)
        .await
        .map_err(|e| e.into_app_error().into_server_fn_error())?;

    cookies::schedule_auth_cookies(&access_token, &refresh_token);

    tracing::info!(user_id = user.id, role = %user.role, "signed in");
    Ok(user.into())
}

/// The signed-in user, or `None` when there is no valid session.
#[cfg_attr(feature = "server", tracing::instrument)]
#[server]
pub async fn get_current_user() -> Result<Option<Session>, ServerFnError> {
    let Ok(claims) = require_auth() else {
        return Ok(None);
    };

    let db = get_db().map_err(AppErrorExt::into_server_fn_error)?;
    let user: Option<UserRow> = sqlx::query_as(
        "SELECT id, username, display_name, email, role FROM users WHERE id = $1",
    )
    .bind(claims.sub)
    .fetch_optional(db)
    .await
    .map_err(|e| e.into_app_error().into_server_fn_error())?;

    if user.is_none() {
        tracing::warn!(user_id = claims.sub, "token for a deleted user");
    }
    Ok(user.map(Session::from))
}

/// Revoke the caller's refresh tokens and clear the auth cookies.
/// Succeeds without a session so that a stale client can always sign out.
#[cfg_attr(feature = "server", tracing::instrument)]
#[server]
pub async fn logout() -> Result<(), ServerFnError> {
    use crate::auth::{cookies, revoke_refresh_tokens};

    if let Ok(claims) = require_auth() {
        let db = get_db().map_err(AppErrorExt::into_server_fn_error)?;
        let revoked = revoke_refresh_tokens(db, claims.sub)
            .await
            .map_err(|e| e.into_app_error().into_server_fn_error())?;
        tracing::info!(user_id = claims.sub, revoked, "signed out");
    }

    cookies::schedule_clear_cookies();
    Ok(())
}

// ── Admin ──────────────────────────────────────────────

#[cfg_attr(feature = "server", tracing::instrument)]
#[server]
pub async fn list_users() -> Result<Vec<UserSummary>, ServerFnError> {
    require_role(&[Role::Admin])?;
    let db = get_db().map_err(AppErrorExt::into_server_fn_error)?;

    sqlx::query_as::<_, UserSummary>(
        "SELECT id, username, display_name, email, role, created_at FROM users ORDER BY display_name",
    )
    .fetch_all(db)
    .await
    .map_err(|e| e.into_app_error().into_server_fn_error())
}

// ── Agent ──────────────────────────────────────────────

/// Clients owned by the calling agent, with their contract counts.
#[cfg_attr(feature = "server", tracing::instrument)]
#[server]
pub async fn list_clients() -> Result<Vec<ClientSummary>, ServerFnError> {
    let (claims, _) = require_role(&[Role::Agent])?;
    let db = get_db().map_err(AppErrorExt::into_server_fn_error)?;

    sqlx::query_as::<_, ClientSummary>(
        r#"SELECT c.id, c.full_name, c.email, c.phone, c.status,
                  COUNT(k.id) AS policy_count
           FROM clients c
           LEFT JOIN contracts k ON k.client_id = c.id
           WHERE c.agent_id = $1
           GROUP BY c.id
           ORDER BY c.full_name"#,
    )
    .bind(claims.sub)
    .fetch_all(db)
    .await
    .map_err(|e| e.into_app_error().into_server_fn_error())
}

// ── Dashboards & reports ───────────────────────────────

/// Dashboard counters. Agents get their own book; the user count is
/// reported to admins only.
#[cfg_attr(feature = "server", tracing::instrument)]
#[server]
pub async fn get_dashboard_stats() -> Result<DashboardStats, ServerFnError> {
    let (claims, role) = require_role(&Role::ALL)?;
    let db = get_db().map_err(AppErrorExt::into_server_fn_error)?;
    let agent_scope = (role == Role::Agent).then_some(claims.sub);

    let total_users = if role == Role::Admin {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(db)
            .await
            .map_err(|e| e.into_app_error().into_server_fn_error())?
    } else {
        0
    };

    let (total_clients, active_contracts, pending_reviews): (i64, i64, i64) = sqlx::query_as(
        r#"SELECT
             (SELECT COUNT(*) FROM clients
               WHERE ($1::BIGINT IS NULL OR agent_id = $1)),
             (SELECT COUNT(*) FROM contracts
               WHERE status = 'active' AND ($1::BIGINT IS NULL OR agent_id = $1)),
             (SELECT COUNT(*) FROM contracts
               WHERE review_status = 'pending' AND ($1::BIGINT IS NULL OR agent_id = $1))"#,
    )
    .bind(agent_scope)
    .fetch_one(db)
    .await
    .map_err(|e| e.into_app_error().into_server_fn_error())?;

    Ok(DashboardStats {
        total_users,
        total_clients,
        active_contracts,
        pending_reviews,
    })
}

/// Chart data for one report over an inclusive date range.
#[cfg_attr(feature = "server", tracing::instrument)]
#[server]
pub async fn get_report(kind: ReportKind, range: DateRange) -> Result<ReportData, ServerFnError> {
    use crate::reports;

    require_role(&[Role::Admin, Role::Reviewer])?;

    let (start, end) = range.bounds().map_err(|e| e.into_server_fn_error())?;
    let labels = range.month_labels().map_err(|e| e.into_server_fn_error())?;
    let db = get_db().map_err(AppErrorExt::into_server_fn_error)?;

    let report = match kind {
        ReportKind::Contracts => {
            let rows: Vec<(chrono::NaiveDate, String)> = sqlx::query_as(
                "SELECT signed_on, status FROM contracts WHERE signed_on BETWEEN $1 AND $2",
            )
            .bind(start)
            .bind(end)
            .fetch_all(db)
            .await
            .map_err(|e| e.into_app_error().into_server_fn_error())?;
            reports::contracts_by_status(labels, &rows)
        }
        ReportKind::Premiums => {
            let rows: Vec<(chrono::NaiveDate, f64)> = sqlx::query_as(
                "SELECT signed_on, premium FROM contracts \
                 WHERE signed_on BETWEEN $1 AND $2 AND status <> 'cancelled'",
            )
            .bind(start)
            .bind(end)
            .fetch_all(db)
            .await
            .map_err(|e| e.into_app_error().into_server_fn_error())?;
            reports::premiums_by_month(labels, &rows)
        }
        ReportKind::AgentPerformance => {
            let rows: Vec<(String, i64)> = sqlx::query_as(
                r#"SELECT u.display_name, COUNT(k.id)
                   FROM users u
                   LEFT JOIN contracts k
                     ON k.agent_id = u.id AND k.signed_on BETWEEN $1 AND $2
                   WHERE u.role = 'agent'
                   GROUP BY u.id, u.display_name"#,
            )
            .bind(start)
            .bind(end)
            .fetch_all(db)
            .await
            .map_err(|e| e.into_app_error().into_server_fn_error())?;
            reports::contracts_per_agent(rows)
        }
    };

    tracing::debug!(?kind, labels = report.labels.len(), "report built");
    Ok(report)
}
