// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 SignalHub

//! # Session Expiry Guard
//!
//! The request gate only runs at request time; it cannot react to a session
//! that expires while a page stays open. The guard closes that gap: when a
//! session is established it arms a one-shot watcher that fires the logout
//! action at the expiry instant.
//!
//! ## Guarantees
//!
//! - The action fires at most once.
//! - Dropping or cancelling the handle before expiry cancels the timer
//!   deterministically; no stale logout fires afterwards.
//! - A session that is already invalid when armed fires immediately.
//!
//! Cancellation uses `tokio_util::sync::CancellationToken`, the same pattern
//! the gateway uses for graceful shutdown.

use std::sync::Mutex;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::{now_ms, Session};

/// Handle to an armed expiry watcher.
///
/// Dropping the handle cancels the pending timer.
pub struct SessionGuard {
    cancel: CancellationToken,
}

impl SessionGuard {
    /// Arm a one-shot watcher that runs `on_expiry` when the session lapses.
    ///
    /// The delay is `max(expires_at_ms - now, 0)`; an already-expired
    /// session fires on the next scheduler tick.
    pub fn arm(session: Session, on_expiry: impl FnOnce() + Send + 'static) -> Self {
        let cancel = CancellationToken::new();
        let watcher = cancel.clone();
        let remaining = session.remaining_ms(now_ms());

        debug!(remaining_ms = remaining, "Arming session expiry guard");

        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_millis(remaining as u64)) => {
                    debug!("Session expired; running logout action");
                    on_expiry();
                }
                _ = watcher.cancelled() => {
                    debug!("Session guard cancelled before expiry");
                }
            }
        });

        Self { cancel }
    }

    /// Cancel the pending watcher. Idempotent.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Holder for the currently-armed guard.
///
/// Installing a new guard cancels the previous one, so re-login before
/// expiry never leaves an orphaned timer behind. This is also the single
/// subscriber to the backend client's unauthorized event.
#[derive(Default)]
pub struct GuardRegistry {
    active: Mutex<Option<SessionGuard>>,
}

impl GuardRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a guard, cancelling any previously active one.
    pub fn install(&self, guard: SessionGuard) {
        let mut active = self.active.lock().expect("guard registry lock poisoned");
        // Replacing drops the old handle, which cancels its timer.
        *active = Some(guard);
    }

    /// Cancel and discard the active guard, if any. Idempotent.
    pub fn cancel_active(&self) {
        let mut active = self.active.lock().expect("guard registry lock poisoned");
        if let Some(guard) = active.take() {
            guard.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_action(counter: &Arc<AtomicUsize>) -> impl FnOnce() + Send + 'static {
        let counter = counter.clone();
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fires_exactly_once_at_expiry() {
        let fired = Arc::new(AtomicUsize::new(0));
        let session = Session {
            token: "abc".into(),
            expires_at_ms: now_ms() + 500,
        };

        let _guard = SessionGuard::arm(session, counting_action(&fired));

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        // No second fire, ever.
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_cancels_the_timer() {
        let fired = Arc::new(AtomicUsize::new(0));
        let session = Session {
            token: "abc".into(),
            expires_at_ms: now_ms() + 500,
        };

        let guard = SessionGuard::arm(session, counting_action(&fired));
        drop(guard);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn already_expired_session_fires_immediately() {
        let fired = Arc::new(AtomicUsize::new(0));
        let session = Session {
            token: "abc".into(),
            expires_at_ms: now_ms() - 1_000,
        };

        let _guard = SessionGuard::arm(session, counting_action(&fired));

        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn registry_install_replaces_previous_guard() {
        let first_fired = Arc::new(AtomicUsize::new(0));
        let second_fired = Arc::new(AtomicUsize::new(0));
        let registry = GuardRegistry::new();

        registry.install(SessionGuard::arm(
            Session {
                token: "first".into(),
                expires_at_ms: now_ms() + 500,
            },
            counting_action(&first_fired),
        ));
        registry.install(SessionGuard::arm(
            Session {
                token: "second".into(),
                expires_at_ms: now_ms() + 800,
            },
            counting_action(&second_fired),
        ));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(first_fired.load(Ordering::SeqCst), 0);
        assert_eq!(second_fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_active_is_idempotent() {
        let fired = Arc::new(AtomicUsize::new(0));
        let registry = GuardRegistry::new();

        registry.install(SessionGuard::arm(
            Session {
                token: "abc".into(),
                expires_at_ms: now_ms() + 500,
            },
            counting_action(&fired),
        ));

        registry.cancel_active();
        registry.cancel_active();

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
