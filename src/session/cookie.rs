//! Session cookie helpers.
//!
//! The cookie carries only the opaque session identifier. It is `HttpOnly`,
//! `SameSite=Strict`, scoped to `/`, and `Secure` when running in production.

use axum::http::{header::COOKIE, HeaderMap};

/// Cookie name for proxy sessions.
pub const SESSION_COOKIE_NAME: &str = "tradovate_session";

/// Builds the `Set-Cookie` value that hands a session to the browser.
#[must_use]
pub fn build_session_cookie(session_id: &str, max_age_secs: i64, secure: bool) -> String {
    let secure_flag = if secure { "; Secure" } else { "" };
    format!(
        "{SESSION_COOKIE_NAME}={session_id}; HttpOnly{secure_flag}; SameSite=Strict; Path=/; Max-Age={max_age_secs}"
    )
}

/// Builds the `Set-Cookie` value that makes the browser drop the session.
#[must_use]
pub fn clear_session_cookie(secure: bool) -> String {
    build_session_cookie("", 0, secure)
}

/// Extracts the session identifier from the request's `Cookie` headers.
///
/// Returns `None` when the cookie is absent or empty.
pub fn extract_session_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| name.trim() == SESSION_COOKIE_NAME)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
