// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User-facing notification and navigation hooks.
//!
//! The client reports outcomes through these traits instead of printing or
//! rendering anything itself. Frontends plug in their own toast/redirect
//! handling; the defaults just log.

/// Transient user notifications (toasts).
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
    /// The session could not be recovered and the user must log in again.
    fn session_expired(&self);
}

/// Navigation performed when the session is lost.
pub trait Navigator: Send + Sync {
    fn redirect_to_login(&self, login_path: &str);
}

/// Notifier that emits tracing events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        tracing::info!(notification = message, "Request succeeded");
    }

    fn error(&self, message: &str) {
        tracing::warn!(notification = message, "Request failed");
    }

    fn session_expired(&self) {
        tracing::warn!("Session expired, please log in again");
    }
}

/// Navigator that only records the redirect in the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn redirect_to_login(&self, login_path: &str) {
        tracing::info!(login_path, "Redirecting to login");
    }
}
