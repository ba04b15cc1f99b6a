// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 SignalHub

//! # Session Module
//!
//! The session is the only entity this gateway owns: a bearer token plus an
//! absolute expiry instant, stored redundantly in two cookies so the request
//! gate can evaluate validity without decoding the token.
//!
//! ## Contract
//!
//! - A session is valid iff both cookie values are present AND the expiry
//!   parses to a finite number AND that number is strictly greater than now.
//! - Partial or malformed cookie state is never a distinct error; it always
//!   resolves to "no session".
//! - Both cookies are written and cleared together.
//!
//! The validity predicate lives here, once, and is shared by the request
//! gate (`crate::gate`), the session extractor, and the expiry guard.

pub mod cookie;
pub mod extract;
pub mod guard;
pub mod resolve;

pub use cookie::{clear_session, read_session, set_session};
pub use extract::ActiveSession;
pub use guard::{GuardRegistry, SessionGuard};
pub use resolve::{resolve_token_and_expiry, SessionResolveError};

/// A user's authenticated window: bearer token plus absolute expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Opaque bearer token forwarded to the backend API.
    pub token: String,
    /// Absolute expiry instant in epoch milliseconds.
    pub expires_at_ms: i64,
}

impl Session {
    /// Whether the session is still valid at the given instant.
    pub fn is_valid_at(&self, now_ms: i64) -> bool {
        !self.token.is_empty() && self.expires_at_ms > now_ms
    }

    /// Whether the session is still valid right now.
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(now_ms())
    }

    /// Milliseconds remaining until expiry, floored at zero.
    pub fn remaining_ms(&self, now_ms: i64) -> i64 {
        (self.expires_at_ms - now_ms).max(0)
    }
}

/// Current wall-clock instant in epoch milliseconds.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// The session validity predicate over the two raw cookie values.
///
/// This is the single authority both the request gate and the in-page guard
/// agree on. Either value missing, a non-finite expiry, or an expiry at or
/// before `now_ms` all resolve to invalid.
pub fn is_valid_session(token: Option<&str>, expires_at: Option<&str>, now_ms: i64) -> bool {
    let Some(token) = token else { return false };
    if token.is_empty() {
        return false;
    }
    let Some(expires_at) = expires_at else {
        return false;
    };
    match parse_expiry_ms(expires_at) {
        Some(expiry) => expiry > now_ms,
        None => false,
    }
}

/// Parse an expiry cookie value into epoch milliseconds.
///
/// Returns `None` unless the value is a finite number. Fractional values are
/// truncated toward zero.
pub fn parse_expiry_ms(value: &str) -> Option<i64> {
    let parsed: f64 = value.trim().parse().ok()?;
    if parsed.is_finite() {
        Some(parsed as i64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_session_requires_both_values_and_future_expiry() {
        let now = 1_700_000_000_000;
        let future = (now + 60_000).to_string();
        let past = (now - 1_000).to_string();

        assert!(is_valid_session(Some("abc"), Some(&future), now));
        assert!(!is_valid_session(Some("abc"), Some(&past), now));
        assert!(!is_valid_session(None, Some(&future), now));
        assert!(!is_valid_session(Some("abc"), None, now));
        assert!(!is_valid_session(None, None, now));
    }

    #[test]
    fn expiry_equal_to_now_is_invalid() {
        let now = 1_700_000_000_000_i64;
        assert!(!is_valid_session(Some("abc"), Some(&now.to_string()), now));
    }

    #[test]
    fn non_numeric_expiry_is_invalid() {
        let now = 1_700_000_000_000;
        assert!(!is_valid_session(Some("abc"), Some("soon"), now));
        assert!(!is_valid_session(Some("abc"), Some(""), now));
        assert!(!is_valid_session(Some("abc"), Some("NaN"), now));
        assert!(!is_valid_session(Some("abc"), Some("inf"), now));
    }

    #[test]
    fn empty_token_is_invalid() {
        let now = 1_700_000_000_000;
        let future = (now + 60_000).to_string();
        assert!(!is_valid_session(Some(""), Some(&future), now));
    }

    #[test]
    fn parse_expiry_accepts_decimal_strings() {
        assert_eq!(parse_expiry_ms("1700000000000"), Some(1_700_000_000_000));
        assert_eq!(parse_expiry_ms(" 1700000000000 "), Some(1_700_000_000_000));
        assert_eq!(parse_expiry_ms("1700000000000.9"), Some(1_700_000_000_000));
        assert_eq!(parse_expiry_ms("garbage"), None);
    }

    #[test]
    fn remaining_ms_floors_at_zero() {
        let session = Session {
            token: "abc".into(),
            expires_at_ms: 1_000,
        };
        assert_eq!(session.remaining_ms(400), 600);
        assert_eq!(session.remaining_ms(1_000), 0);
        assert_eq!(session.remaining_ms(5_000), 0);
    }
}
