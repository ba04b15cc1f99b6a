// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 SignalHub

//! Session cookie reading and writing.
//!
//! The session is persisted as two cookies so the request gate can check
//! validity without decoding the token:
//!
//! | Name | Value | Attributes |
//! |------|-------|------------|
//! | `auth_token` | opaque bearer string | `Path=/; Expires=<expiry>; SameSite=Lax` |
//! | `auth_expires_at` | decimal epoch-ms string | same |
//!
//! No `Secure` or `HttpOnly` attribute is set; the original deployment wrote
//! these cookies from script, which makes `HttpOnly` structurally impossible.
//! That is a known security limitation of the design, preserved here.

use axum::http::{
    header::{InvalidHeaderValue, COOKIE, SET_COOKIE},
    HeaderMap, HeaderValue,
};
use chrono::TimeZone;

use super::{parse_expiry_ms, Session};

/// Cookie holding the opaque bearer token.
pub const AUTH_TOKEN_COOKIE: &str = "auth_token";

/// Cookie holding the absolute expiry instant (decimal epoch milliseconds).
pub const AUTH_EXPIRES_COOKIE: &str = "auth_expires_at";

/// Build the two `Set-Cookie` values establishing a session.
///
/// Both cookies carry an `Expires` attribute equal to the session expiry, so
/// the browser drops them on its own once the session lapses.
pub fn set_session(
    token: &str,
    expires_at_ms: i64,
) -> Result<[HeaderValue; 2], InvalidHeaderValue> {
    let expires = http_date(expires_at_ms);
    let token_cookie = HeaderValue::from_str(&format!(
        "{AUTH_TOKEN_COOKIE}={token}; Path=/; Expires={expires}; SameSite=Lax"
    ))?;
    let expiry_cookie = HeaderValue::from_str(&format!(
        "{AUTH_EXPIRES_COOKIE}={expires_at_ms}; Path=/; Expires={expires}; SameSite=Lax"
    ))?;
    Ok([token_cookie, expiry_cookie])
}

/// Build the two `Set-Cookie` values expiring a session immediately.
///
/// Clearing is idempotent: applying it to an absent session is a no-op.
pub fn clear_session() -> [HeaderValue; 2] {
    [
        HeaderValue::from_static("auth_token=; Path=/; Max-Age=0; SameSite=Lax"),
        HeaderValue::from_static("auth_expires_at=; Path=/; Max-Age=0; SameSite=Lax"),
    ]
}

/// Append both session cookies to a response header map.
pub fn apply_cookies(headers: &mut HeaderMap, cookies: [HeaderValue; 2]) {
    for cookie in cookies {
        headers.append(SET_COOKIE, cookie);
    }
}

/// Read the session from a request's `Cookie` header, if both halves exist.
///
/// Presence only: the expiry must parse, but callers decide whether it is
/// still in the future via [`Session::is_valid_at`].
pub fn read_session(headers: &HeaderMap) -> Option<Session> {
    let token = cookie_value(headers, AUTH_TOKEN_COOKIE)?;
    if token.is_empty() {
        return None;
    }
    let expires_at_ms = parse_expiry_ms(&cookie_value(headers, AUTH_EXPIRES_COOKIE)?)?;
    Some(Session {
        token,
        expires_at_ms,
    })
}

/// Whether the request headers carry a currently-valid session.
pub fn session_is_valid(headers: &HeaderMap, now_ms: i64) -> bool {
    let token = cookie_value(headers, AUTH_TOKEN_COOKIE);
    let expires_at = cookie_value(headers, AUTH_EXPIRES_COOKIE);
    super::is_valid_session(token.as_deref(), expires_at.as_deref(), now_ms)
}

/// Extract a single cookie value from the `Cookie` header.
fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let header = headers.get(COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        let trimmed = pair.trim();
        let mut parts = trimmed.splitn(2, '=');
        let key = parts.next()?.trim();
        let val = parts.next()?.trim();
        if key == name {
            return Some(val.to_string());
        }
    }
    None
}

/// Format an epoch-ms instant as an RFC 7231 HTTP date for `Expires`.
fn http_date(epoch_ms: i64) -> String {
    match chrono::Utc.timestamp_millis_opt(epoch_ms).single() {
        Some(instant) => instant.format("%a, %d %b %Y %H:%M:%S GMT").to_string(),
        // Out-of-range instants degrade to the epoch, which expires the cookie.
        None => "Thu, 01 Jan 1970 00:00:00 GMT".to_string(),
    }
}
