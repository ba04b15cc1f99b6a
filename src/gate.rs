// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 SignalHub

//! # Edge Request Gate
//!
//! Middleware deciding, per incoming request, whether to serve the requested
//! path, redirect to login, or redirect to the dashboard. It runs before any
//! handler and is stateless per request.
//!
//! ## Routing policy (evaluated in order)
//!
//! 1. Path under the protected prefix with an invalid session: redirect to
//!    the login path and clear both session cookies on the response.
//! 2. Path exactly the login path with a valid session: redirect to the
//!    dashboard root.
//! 3. Otherwise pass the request through unmodified.
//!
//! The gate is layered only on the protected subtree and the login page;
//! every other route bypasses it entirely. Cookie clearing happens only on
//! the redirect-to-login branch.

use axum::{
    extract::Request,
    http::{header::LOCATION, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::session::cookie::{apply_cookies, clear_session, session_is_valid};
use crate::session::now_ms;

/// URL subtree requiring a valid session.
pub const PROTECTED_PREFIX: &str = "/dashboard";

/// Public authentication page.
pub const LOGIN_PATH: &str = "/login";

/// Gate middleware. Layer with `axum::middleware::from_fn` on the gated
/// routes only.
pub async fn session_gate(request: Request, next: Next) -> Response {
    let path = request.uri().path();
    let valid = session_is_valid(request.headers(), now_ms());

    if is_protected(path) && !valid {
        debug!(path, "Gate: no valid session for protected path");
        return redirect_to_login_clearing();
    }

    if path == LOGIN_PATH && valid {
        debug!("Gate: valid session on login page");
        return redirect(PROTECTED_PREFIX);
    }

    next.run(request).await
}

/// Whether the path falls under the protected prefix.
fn is_protected(path: &str) -> bool {
    path == PROTECTED_PREFIX || path.starts_with("/dashboard/")
}

/// Redirect to the login page, clearing both session cookies.
///
/// Shared with the session extractor's rejection so expiry detected at the
/// edge and expiry detected in a handler recover identically.
pub fn redirect_to_login_clearing() -> Response {
    let mut response = redirect(LOGIN_PATH);
    apply_cookies(response.headers_mut(), clear_session());
    response
}

fn redirect(target: &'static str) -> Response {
    (
        StatusCode::SEE_OTHER,
        [(LOCATION, HeaderValue::from_static(target))],
    )
        .into_response()
}
