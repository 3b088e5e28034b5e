use axum::http::{header, HeaderMap, HeaderValue};
use cookie::{Cookie, SameSite};
use std::sync::{Arc, Mutex};

use crate::config::session_settings;

pub const ACCESS_COOKIE: &str = "pd_access";
pub const REFRESH_COOKIE: &str = "pd_refresh";

fn cookie_secure() -> bool {
    std::env::var("COOKIE_SECURE")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(false)
}

fn cookie_domain() -> Option<String> {
    std::env::var("COOKIE_DOMAIN").ok().filter(|d| !d.is_empty())
}

/// HTTP-only, lax, site-wide cookie. `max_age_secs == 0` expires it.
fn build_cookie(name: &'static str, value: &str, max_age_secs: i64) -> HeaderValue {
    let mut builder = Cookie::build((name, value.to_string()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(cookie::time::Duration::seconds(max_age_secs))
        .secure(cookie_secure());
    if let Some(domain) = cookie_domain() {
        builder = builder.domain(domain);
    }
    HeaderValue::from_str(&builder.build().to_string())
        .unwrap_or_else(|_| HeaderValue::from_static(""))
}

pub fn build_access_cookie(token: &str) -> HeaderValue {
    build_cookie(ACCESS_COOKIE, token, session_settings().access_token_minutes * 60)
}

pub fn build_refresh_cookie(token: &str) -> HeaderValue {
    build_cookie(REFRESH_COOKIE, token, session_settings().refresh_token_days * 86_400)
}

/// Access token from the cookie, or from a Bearer header for API clients.
pub fn extract_access_token(headers: &HeaderMap) -> Option<String> {
    extract_cookie(headers, ACCESS_COOKIE).or_else(|| {
        headers
            .get(header::AUTHORIZATION)?
            .to_str()
            .ok()?
            .strip_prefix("Bearer ")
            .map(str::to_string)
    })
}

pub fn extract_refresh_token(headers: &HeaderMap) -> Option<String> {
    extract_cookie(headers, REFRESH_COOKIE)
}

fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|piece| Cookie::parse(piece.trim().to_string()).ok())
        .find(|c| c.name() == name)
        .map(|c| c.value().to_string())
}

pub fn set_auth_cookies(headers: &mut HeaderMap, access_token: &str, refresh_token: &str) {
    headers.append(header::SET_COOKIE, build_access_cookie(access_token));
    headers.append(header::SET_COOKIE, build_refresh_cookie(refresh_token));
}

pub fn clear_auth_cookies(headers: &mut HeaderMap) {
    headers.append(header::SET_COOKIE, build_cookie(ACCESS_COOKIE, "", 0));
    headers.append(header::SET_COOKIE, build_cookie(REFRESH_COOKIE, "", 0));
}

/// Cookie change requested by a server function, applied by the auth middleware.
#[derive(Clone, Debug, PartialEq)]
pub enum PendingCookieAction {
    Set {
        access_token: String,
        refresh_token: String,
    },
    Clear,
}

/// Slot the middleware puts in request extensions for server functions to fill.
#[derive(Clone, Debug, Default)]
pub struct CookieSlot(pub Arc<Mutex<Option<PendingCookieAction>>>);

impl CookieSlot {
    pub fn put(&self, action: PendingCookieAction) {
        if let Ok(mut slot) = self.0.lock() {
            *slot = Some(action);
        }
    }

    pub fn take(&self) -> Option<PendingCookieAction> {
        self.0.lock().ok().and_then(|mut slot| slot.take())
    }
}

fn schedule(action: PendingCookieAction) {
    let Some(ctx) = dioxus::fullstack::FullstackContext::current() else {
        tracing::warn!("no request context; cookie change dropped");
        return;
    };
    let parts = ctx.parts_mut();
    match parts.extensions.get::<CookieSlot>() {
        Some(slot) => slot.put(action),
        None => tracing::warn!("auth middleware not installed; cookie change dropped"),
    }
}

pub fn schedule_auth_cookies(access_token: &str, refresh_token: &str) {
    schedule(PendingCookieAction::Set {
        access_token: access_token.to_string(),
        refresh_token: refresh_token.to_string(),
    });
}

pub fn schedule_clear_cookies() {
    schedule(PendingCookieAction::Clear);
}
