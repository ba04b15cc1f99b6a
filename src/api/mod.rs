// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 SignalHub

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    gate::session_gate,
    models::{LoginRequest, SessionResponse, TickerSymbol, VerifyOtpRequest},
    state::AppState,
};

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod pages;

pub fn router(state: AppState) -> Router {
    // The gate applies only to the protected subtree and the login page;
    // every other route bypasses it.
    let gated = Router::new()
        .route("/login", get(pages::login))
        .route("/dashboard", get(pages::dashboard))
        .route("/dashboard/api/signals", get(dashboard::list_signals))
        .route(
            "/dashboard/api/watchlists",
            get(dashboard::list_watchlists).post(dashboard::create_watchlist),
        )
        .route(
            "/dashboard/api/notifications",
            get(dashboard::list_notifications),
        )
        .route(
            "/dashboard/api/tickets",
            get(dashboard::list_tickets).post(dashboard::create_ticket),
        )
        .route(
            "/dashboard/api/market/{symbol}",
            get(dashboard::market_data),
        )
        .route("/dashboard/api/plans", get(dashboard::list_plans))
        .route(
            "/dashboard/api/subscriptions",
            get(dashboard::list_subscriptions),
        )
        .route("/dashboard/api/profile", get(dashboard::profile))
        .route_layer(middleware::from_fn(session_gate));

    let auth_routes = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/verify-otp", post(auth::verify_otp))
        .route("/auth/logout", post(auth::logout));

    Router::new()
        .route("/", get(pages::index))
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .merge(gated)
        .merge(auth_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::login,
        auth::verify_otp,
        auth::logout,
        dashboard::list_signals,
        dashboard::list_watchlists,
        dashboard::create_watchlist,
        dashboard::list_notifications,
        dashboard::list_tickets,
        dashboard::create_ticket,
        dashboard::market_data,
        dashboard::list_plans,
        dashboard::list_subscriptions,
        dashboard::profile,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(schemas(LoginRequest, VerifyOtpRequest, SessionResponse, TickerSymbol)),
    tags(
        (name = "Auth", description = "Login, OTP verification, and logout"),
        (name = "Dashboard", description = "Authorized passthrough for dashboard data"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let app = router(AppState::default());
        // Ensure the router can be converted into a service without panicking.
        let _ = app.into_make_service();
    }
}
