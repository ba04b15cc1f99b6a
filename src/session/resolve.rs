// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 SignalHub

//! Resolving a session from a backend auth response.
//!
//! Login and OTP verification responses vary in shape across backend
//! versions: the token may sit at the top level or inside a `data` envelope,
//! under any of a handful of field names. The expiry is derived by priority:
//!
//! 1. an explicit positive `expiresIn`/`expires_in` TTL in seconds;
//! 2. the `exp` claim decoded from the token's middle segment — decoded
//!    without signature verification, advisory only, never used for an
//!    authorization decision;
//! 3. a 24-hour default.
//!
//! A response with no recognizable token is a fatal shape error: the caller
//! must surface it as a login failure, never default to an empty session.

use serde::Deserialize;
use serde_json::Value;

use super::{now_ms, Session};

/// Fallback session lifetime when the response carries no TTL and the token
/// has no readable `exp` claim.
const DEFAULT_SESSION_TTL_MS: i64 = 24 * 60 * 60 * 1000;

/// Token field names checked, in order, at each level.
const TOKEN_FIELDS: [&str; 4] = ["token", "accessToken", "access_token", "jwt"];

/// TTL-in-seconds field names checked, in order, at each level.
const TTL_FIELDS: [&str; 2] = ["expiresIn", "expires_in"];

/// Errors resolving a session from an auth response payload.
#[derive(Debug, thiserror::Error)]
pub enum SessionResolveError {
    /// No token under any recognized field, at the top level or under `data`.
    #[error("no token found in auth response")]
    TokenMissing,
}

/// Minimal claim set read from an unverified token.
#[derive(Debug, Deserialize)]
struct ExpiryClaim {
    #[serde(default)]
    exp: i64,
}

/// Extract the bearer token and absolute expiry from an auth response.
pub fn resolve_token_and_expiry(payload: &Value) -> Result<Session, SessionResolveError> {
    resolve_at(payload, now_ms())
}

/// Clock-injected variant of [`resolve_token_and_expiry`].
fn resolve_at(payload: &Value, now_ms: i64) -> Result<Session, SessionResolveError> {
    let token = find_token(payload).ok_or(SessionResolveError::TokenMissing)?;

    let expires_at_ms = find_ttl_seconds(payload)
        .map(|ttl| now_ms + ttl * 1000)
        .or_else(|| claim_expiry_ms(&token))
        .unwrap_or(now_ms + DEFAULT_SESSION_TTL_MS);

    Ok(Session {
        token,
        expires_at_ms,
    })
}

/// Search the payload for a bearer token: top level first, then the `data`
/// envelope.
fn find_token(payload: &Value) -> Option<String> {
    token_in(payload).or_else(|| payload.get("data").and_then(token_in))
}

fn token_in(level: &Value) -> Option<String> {
    TOKEN_FIELDS.iter().find_map(|field| {
        level
            .get(field)
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
    })
}

/// Search the payload for a positive TTL in seconds.
fn find_ttl_seconds(payload: &Value) -> Option<i64> {
    ttl_in(payload).or_else(|| payload.get("data").and_then(ttl_in))
}

fn ttl_in(level: &Value) -> Option<i64> {
    TTL_FIELDS.iter().find_map(|field| {
        level
            .get(field)
            .and_then(Value::as_i64)
            .filter(|ttl| *ttl > 0)
    })
}

/// Read the `exp` claim from the token without verifying its signature.
///
/// Returns `None` for opaque (non-JWT) tokens or a missing/zero claim.
fn claim_expiry_ms(token: &str) -> Option<i64> {
    let decoded = jsonwebtoken::dangerous::insecure_decode::<ExpiryClaim>(token).ok()?;
    let exp = decoded.claims.exp;
    if exp > 0 {
        Some(exp * 1000)
    } else {
        None
    }
}
