// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 SignalHub

//! Axum extractor for the active session.
//!
//! Use the `ActiveSession` extractor in handlers that need the bearer token:
//!
//! ```rust,ignore
//! async fn list_signals(ActiveSession(session): ActiveSession) -> impl IntoResponse {
//!     // session.token is the bearer forwarded to the backend
//! }
//! ```
//!
//! Gated routes are already screened by the request gate, so the extractor
//! normally succeeds; it exists as the in-handler authority for the same
//! predicate, and its rejection mirrors the gate's invalid-session branch.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Response},
};

use super::{cookie::read_session, now_ms, Session};
use crate::gate::redirect_to_login_clearing;

/// Extractor yielding the request's valid session.
pub struct ActiveSession(pub Session);

/// Rejection for a missing, malformed, or expired session.
///
/// Resolves to the same recovery as the gate: clear both cookies and
/// redirect to the login page.
#[derive(Debug)]
pub struct SessionRejection;

impl IntoResponse for SessionRejection {
    fn into_response(self) -> Response {
        redirect_to_login_clearing()
    }
}

impl<S> FromRequestParts<S> for ActiveSession
where
    S: Send + Sync,
{
    type Rejection = SessionRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = read_session(&parts.headers).ok_or(SessionRejection)?;
        if !session.is_valid_at(now_ms()) {
            return Err(SessionRejection);
        }
        Ok(ActiveSession(session))
    }
}
