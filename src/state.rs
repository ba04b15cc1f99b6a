// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 SignalHub

use std::sync::Arc;

use crate::backend::BackendClient;
use crate::session::GuardRegistry;

#[derive(Clone)]
pub struct AppState {
    /// Client for the remote SignalHub backend API.
    pub backend: Arc<BackendClient>,
    /// Currently-armed session expiry guard.
    pub guards: Arc<GuardRegistry>,
}

impl AppState {
    pub fn new(backend: BackendClient) -> Self {
        Self {
            backend: Arc::new(backend),
            guards: Arc::new(GuardRegistry::new()),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        let backend = BackendClient::with_base_url("http://localhost:9000")
            .expect("default backend URL is valid");
        Self::new(backend)
    }
}
