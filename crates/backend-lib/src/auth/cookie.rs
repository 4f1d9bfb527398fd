// ============================
// crates/backend-lib/src/auth/cookie.rs
// ============================
//! Session cookie handling.
use axum::http::{header, HeaderMap, HeaderValue};

use crate::error::AppError;

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "blog_session";

const COOKIE_ATTRIBUTES: &str = "Path=/; HttpOnly; Secure; SameSite=Strict";

const CLEARED_COOKIE: &str = "blog_session=; Max-Age=0; Path=/; HttpOnly; Secure; SameSite=Strict";

/// `Set-Cookie` value that stores `token` for `max_age_secs`
pub fn session_cookie(token: &str, max_age_secs: u64) -> Result<HeaderValue, AppError> {
    HeaderValue::from_str(&format!(
        "{SESSION_COOKIE}={token}; Max-Age={max_age_secs}; {COOKIE_ATTRIBUTES}"
    ))
    .map_err(|e| AppError::Internal(format!("invalid session cookie: {e}")))
}

/// `Set-Cookie` value that removes the session cookie
pub fn clear_session_cookie() -> HeaderValue {
    HeaderValue::from_static(CLEARED_COOKIE)
}

/// Session token from the request's `Cookie` headers, if any
pub fn read_session_cookie(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}
