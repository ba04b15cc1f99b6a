// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 SignalHub

use std::{env, net::SocketAddr, time::Duration};

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use signalhub_web::{
    api::router,
    backend::BackendClient,
    config::{HOST_ENV, LOG_FORMAT_ENV, PORT_ENV},
    state::AppState,
};

#[tokio::main]
async fn main() {
    init_tracing();

    let backend = BackendClient::from_env().expect("Failed to configure backend client");
    let state = AppState::new(backend);
    let shutdown = CancellationToken::new();

    // Single subscriber to the backend's unauthorized events: any 401 tears
    // down the active expiry guard so no stale logout timer survives.
    spawn_unauthorized_listener(&state, shutdown.clone());

    let app = router(state);

    let host = env::var(HOST_ENV).unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var(PORT_ENV)
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .expect("Failed to parse bind address");

    let handle = axum_server::Handle::new();
    tokio::spawn(wait_for_shutdown(handle.clone(), shutdown));

    info!("SignalHub web gateway listening on http://{addr} (docs at /docs)");

    axum_server::bind(addr)
        .handle(handle)
        .serve(app.into_make_service())
        .await
        .expect("HTTP server failed");
}

/// Subscribe to the backend client's 401 broadcast and cancel the active
/// session guard on each event.
fn spawn_unauthorized_listener(state: &AppState, shutdown: CancellationToken) {
    let backend = state.backend.clone();
    let guards = state.guards.clone();
    let mut unauthorized = backend.subscribe_unauthorized();

    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                event = unauthorized.recv() => match event {
                    Ok(_) => {
                        warn!("Backend reported 401; cancelling active session guard");
                        guards.cancel_active();
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                },
            }
        }
    });
}

/// Trigger graceful shutdown on Ctrl-C.
async fn wait_for_shutdown(handle: axum_server::Handle<SocketAddr>, shutdown: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_err() {
        warn!("Failed to listen for shutdown signal");
        return;
    }
    info!("Shutdown signal received");
    shutdown.cancel();
    handle.graceful_shutdown(Some(Duration::from_secs(10)));
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=debug"));

    let json = env::var(LOG_FORMAT_ENV)
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
