// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 SignalHub

//! Authorized passthrough handlers for dashboard data.
//!
//! Each handler forwards to the corresponding backend resource with the
//! session's bearer token attached and returns the body as opaque JSON; the
//! gateway does not model the resource shapes.
//!
//! A 401 from the backend is the repository-wide "session invalid" signal:
//! the response clears both cookies and redirects to the login page, the
//! same recovery the request gate applies.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use crate::{
    backend::BackendError,
    error::ApiError,
    gate::redirect_to_login_clearing,
    models::TickerSymbol,
    session::ActiveSession,
    state::AppState,
};

/// Error wrapper applying the global 401 policy to passthrough calls.
#[derive(Debug)]
pub struct DashboardError(BackendError);

impl From<BackendError> for DashboardError {
    fn from(err: BackendError) -> Self {
        Self(err)
    }
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        match self.0 {
            BackendError::Unauthorized => redirect_to_login_clearing(),
            other => ApiError::from(other).into_response(),
        }
    }
}

#[utoipa::path(
    get,
    path = "/dashboard/api/signals",
    tag = "Dashboard",
    responses((status = 200, description = "Trading signals for the account"))
)]
pub async fn list_signals(
    ActiveSession(session): ActiveSession,
    State(state): State<AppState>,
) -> Result<Json<Value>, DashboardError> {
    Ok(Json(
        state.backend.get_authorized("/signals", &session.token).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/dashboard/api/watchlists",
    tag = "Dashboard",
    responses((status = 200, description = "The account's watchlists"))
)]
pub async fn list_watchlists(
    ActiveSession(session): ActiveSession,
    State(state): State<AppState>,
) -> Result<Json<Value>, DashboardError> {
    Ok(Json(
        state
            .backend
            .get_authorized("/watchlists", &session.token)
            .await?,
    ))
}

#[utoipa::path(
    post,
    path = "/dashboard/api/watchlists",
    tag = "Dashboard",
    responses((status = 200, description = "Watchlist created"))
)]
pub async fn create_watchlist(
    ActiveSession(session): ActiveSession,
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, DashboardError> {
    Ok(Json(
        state
            .backend
            .post_authorized("/watchlists", &session.token, &body)
            .await?,
    ))
}

#[utoipa::path(
    get,
    path = "/dashboard/api/notifications",
    tag = "Dashboard",
    responses((status = 200, description = "Unread and recent notifications"))
)]
pub async fn list_notifications(
    ActiveSession(session): ActiveSession,
    State(state): State<AppState>,
) -> Result<Json<Value>, DashboardError> {
    Ok(Json(
        state
            .backend
            .get_authorized("/notifications", &session.token)
            .await?,
    ))
}

#[utoipa::path(
    get,
    path = "/dashboard/api/tickets",
    tag = "Dashboard",
    responses((status = 200, description = "Support tickets for the account"))
)]
pub async fn list_tickets(
    ActiveSession(session): ActiveSession,
    State(state): State<AppState>,
) -> Result<Json<Value>, DashboardError> {
    Ok(Json(
        state
            .backend
            .get_authorized("/tickets", &session.token)
            .await?,
    ))
}

#[utoipa::path(
    post,
    path = "/dashboard/api/tickets",
    tag = "Dashboard",
    responses((status = 200, description = "Support ticket created"))
)]
pub async fn create_ticket(
    ActiveSession(session): ActiveSession,
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, DashboardError> {
    Ok(Json(
        state
            .backend
            .post_authorized("/tickets", &session.token, &body)
            .await?,
    ))
}

#[utoipa::path(
    get,
    path = "/dashboard/api/market/{symbol}",
    params(("symbol" = TickerSymbol, Path, description = "Ticker symbol to fetch")),
    tag = "Dashboard",
    responses((status = 200, description = "Market data for the symbol"))
)]
pub async fn market_data(
    ActiveSession(session): ActiveSession,
    Path(symbol): Path<TickerSymbol>,
    State(state): State<AppState>,
) -> Result<Json<Value>, DashboardError> {
    Ok(Json(
        state
            .backend
            .get_authorized(&format!("/market/{symbol}"), &session.token)
            .await?,
    ))
}

#[utoipa::path(
    get,
    path = "/dashboard/api/plans",
    tag = "Dashboard",
    responses((status = 200, description = "Available subscription plans"))
)]
pub async fn list_plans(
    ActiveSession(session): ActiveSession,
    State(state): State<AppState>,
) -> Result<Json<Value>, DashboardError> {
    Ok(Json(
        state.backend.get_authorized("/plans", &session.token).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/dashboard/api/subscriptions",
    tag = "Dashboard",
    responses((status = 200, description = "The account's active subscriptions"))
)]
pub async fn list_subscriptions(
    ActiveSession(session): ActiveSession,
    State(state): State<AppState>,
) -> Result<Json<Value>, DashboardError> {
    Ok(Json(
        state
            .backend
            .get_authorized("/subscriptions", &session.token)
            .await?,
    ))
}

#[utoipa::path(
    get,
    path = "/dashboard/api/profile",
    tag = "Dashboard",
    responses((status = 200, description = "The account profile"))
)]
pub async fn profile(
    ActiveSession(session): ActiveSession,
    State(state): State<AppState>,
) -> Result<Json<Value>, DashboardError> {
    Ok(Json(
        state
            .backend
            .get_authorized("/profile", &session.token)
            .await?,
    ))
}
