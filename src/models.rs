// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 SignalHub

//! # API Data Models
//!
//! Request and response structures owned by the gateway itself. All types
//! derive `Serialize`/`Deserialize` and `ToSchema` for JSON handling and
//! OpenAPI documentation.
//!
//! Dashboard resource payloads (signals, watchlists, notifications, tickets,
//! market data, plans, subscriptions) are *not* modeled here: the gateway
//! forwards them as opaque JSON from the backend.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// =============================================================================
// Ticker Symbol Type
// =============================================================================

/// Market ticker symbol wrapper (e.g. `EURUSD`, `BTCUSDT`).
///
/// Provides type safety for symbols passed through to the market data
/// endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
pub struct TickerSymbol(pub String);

impl std::fmt::Display for TickerSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TickerSymbol {
    fn from(value: &str) -> Self {
        TickerSymbol(value.to_string())
    }
}

// =============================================================================
// Auth Models
// =============================================================================

/// Credentials submitted to start a login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Account email address.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// One-time code submitted to complete an OTP challenge.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VerifyOtpRequest {
    /// Account email address the code was sent to.
    pub email: String,
    /// The one-time code.
    pub code: String,
}

/// Session establishment result returned once cookies are set.
///
/// The token itself travels only in the cookies; the body carries the expiry
/// so the page can display the authenticated window.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct SessionResponse {
    /// Absolute session expiry, epoch milliseconds.
    pub expires_at_ms: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticker_symbol_displays_inner_value() {
        let symbol = TickerSymbol::from("EURUSD");
        assert_eq!(symbol.to_string(), "EURUSD");
    }

    #[test]
    fn login_request_round_trips_json() {
        let request = LoginRequest {
            email: "trader@example.com".into(),
            password: "hunter2".into(),
        };
        let json = serde_json::to_string(&request).unwrap();
        let parsed: LoginRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.email, request.email);
    }
}
