// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 SignalHub

//! Login, OTP verification, and logout handlers.
//!
//! Both login flows follow the same shape: forward the credentials to the
//! backend, resolve a session from whatever payload shape it answers with,
//! write the cookie pair, and arm the expiry guard. A payload with no
//! recognizable token is a fatal response-shape error surfaced as a login
//! failure, never a silently-empty session.

use axum::{
    extract::State,
    http::{header::LOCATION, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::{info, warn};

use crate::{
    error::ApiError,
    gate::LOGIN_PATH,
    models::{LoginRequest, SessionResponse, VerifyOtpRequest},
    session::{
        cookie::{apply_cookies, clear_session, set_session},
        resolve_token_and_expiry, SessionGuard,
    },
    state::AppState,
};

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Session established", body = SessionResponse),
        (status = 401, description = "Credentials rejected"),
        (status = 502, description = "Backend unreachable or response unusable")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let payload = state.backend.login(&request).await?;
    establish_session(&state, &payload)
}

#[utoipa::path(
    post,
    path = "/auth/verify-otp",
    request_body = VerifyOtpRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Session established", body = SessionResponse),
        (status = 401, description = "Code rejected"),
        (status = 502, description = "Backend unreachable or response unusable")
    )
)]
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(request): Json<VerifyOtpRequest>,
) -> Result<Response, ApiError> {
    let payload = state.backend.verify_otp(&request).await?;
    establish_session(&state, &payload)
}

#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "Auth",
    responses((status = 303, description = "Session cleared, redirected to login"))
)]
pub async fn logout(State(state): State<AppState>) -> Response {
    state.guards.cancel_active();

    let mut response = (
        StatusCode::SEE_OTHER,
        [(LOCATION, HeaderValue::from_static(LOGIN_PATH))],
    )
        .into_response();
    apply_cookies(response.headers_mut(), clear_session());
    info!("Session cleared on logout");
    response
}

/// Shared tail of both login flows: resolve, set cookies, arm the guard.
fn establish_session(state: &AppState, payload: &Value) -> Result<Response, ApiError> {
    let session =
        resolve_token_and_expiry(payload).map_err(|e| ApiError::bad_gateway(e.to_string()))?;

    let cookies = set_session(&session.token, session.expires_at_ms)
        .map_err(|e| ApiError::internal(format!("session cookie not writable: {e}")))?;

    let expires_at_ms = session.expires_at_ms;
    state.guards.install(SessionGuard::arm(session, move || {
        warn!(
            expires_at_ms,
            "Session expired; next gated request re-authenticates"
        );
    }));

    let mut response = (StatusCode::OK, Json(SessionResponse { expires_at_ms })).into_response();
    apply_cookies(response.headers_mut(), cookies);
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::to_bytes,
        http::header::SET_COOKIE,
        routing::post,
        Json as AxumJson, Router,
    };
    use serde_json::json;

    use crate::backend::BackendClient;
    use crate::session::now_ms;

    /// Serve a fixed JSON payload on every auth route of a throwaway local
    /// server and return its base URL.
    async fn mock_backend(payload: Value) -> String {
        let app = Router::new()
            .route(
                "/auth/login",
                post(move || {
                    let payload = payload.clone();
                    async move { AxumJson(payload) }
                }),
            )
            .route(
                "/auth/verify-otp",
                post(|| async { AxumJson(json!({ "token": "otp-token" })) }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn state_for(base_url: &str) -> AppState {
        AppState::new(BackendClient::with_base_url(base_url).unwrap())
    }

    fn login_request() -> LoginRequest {
        LoginRequest {
            email: "trader@example.com".into(),
            password: "hunter2".into(),
        }
    }

    #[tokio::test]
    async fn login_sets_both_cookies_and_reports_expiry() {
        let base = mock_backend(json!({ "data": { "accessToken": "x", "expiresIn": 3600 } })).await;
        let state = state_for(&base);
        let before = now_ms();

        let response = login(State(state), Json(login_request())).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let cookies: Vec<String> = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();
        assert_eq!(cookies.len(), 2);
        assert!(cookies.iter().any(|c| c.starts_with("auth_token=x;")));
        assert!(cookies.iter().any(|c| c.starts_with("auth_expires_at=")));

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let session: SessionResponse = serde_json::from_slice(&body).unwrap();
        assert!(session.expires_at_ms >= before + 3_600_000);
        assert!(session.expires_at_ms <= now_ms() + 3_600_000);
    }

    #[tokio::test]
    async fn login_without_token_in_payload_fails_loudly() {
        let base = mock_backend(json!({ "message": "ok", "data": { "user": {} } })).await;
        let state = state_for(&base);

        let err = login(State(state), Json(login_request())).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_GATEWAY);
        assert!(err.message.contains("no token found"));
    }

    #[tokio::test]
    async fn verify_otp_establishes_a_session() {
        let base = mock_backend(json!({})).await;
        let state = state_for(&base);

        let response = verify_otp(
            State(state),
            Json(VerifyOtpRequest {
                email: "trader@example.com".into(),
                code: "123456".into(),
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let cookies: Vec<&HeaderValue> = response.headers().get_all(SET_COOKIE).iter().collect();
        assert_eq!(cookies.len(), 2);
    }

    #[tokio::test]
    async fn logout_clears_cookies_and_redirects() {
        let state = AppState::default();
        let response = logout(State(state)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(LOCATION).unwrap(), "/login");

        let cookies: Vec<&str> = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap())
            .collect();
        assert_eq!(cookies.len(), 2);
        assert!(cookies.iter().all(|c| c.contains("Max-Age=0")));
    }
}
