// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account endpoints: login, OTP, registration, profile and logout.
//!
//! Every call that yields a session persists the new token pair before
//! returning, so the next request is authenticated.

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::models::{
    AuthSession, ChangePasswordRequest, LoginRequest, OtpSendRequest, OtpVerifyRequest,
    RegisterRequest, UpdateProfileRequest, User,
};
use serde::de::IgnoredAny;
use validator::Validate;

/// High-level auth service wrapping the shared client.
#[derive(Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Whether an access token is currently stored.
    pub fn is_logged_in(&self) -> Result<bool, ApiError> {
        let token = self
            .client
            .token_store()
            .access_token()
            .map_err(|e| self.client.report(e))?;
        Ok(token.is_some())
    }

    // ─── Session creation ────────────────────────────────────────────────────

    /// Log in with email and password.
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthSession, ApiError> {
        request.validate()?;
        let session: AuthSession = self.client.post_anonymous("/auth/login", request).await?;
        self.store_session(&session)?;
        tracing::info!(user_id = %session.user.id, "Logged in with password");
        Ok(session)
    }

    /// Send a one-time passcode to an email address or phone number.
    pub async fn send_otp(&self, identifier: &str) -> Result<(), ApiError> {
        let request = OtpSendRequest {
            identifier: identifier.trim().to_string(),
        };
        request.validate()?;
        self.client
            .post_anonymous::<IgnoredAny, _>("/auth/send-otp", &request)
            .await?;
        tracing::info!("OTP sent");
        Ok(())
    }

    /// Exchange a passcode for a session.
    pub async fn verify_otp(&self, identifier: &str, otp: &str) -> Result<AuthSession, ApiError> {
        let request = OtpVerifyRequest {
            identifier: identifier.trim().to_string(),
            otp: otp.trim().to_string(),
        };
        request.validate()?;
        let session: AuthSession = self
            .client
            .post_anonymous("/auth/verify-otp", &request)
            .await?;
        self.store_session(&session)?;
        tracing::info!(user_id = %session.user.id, "Logged in with OTP");
        Ok(session)
    }

    /// Create an account. The server logs the new user in immediately.
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthSession, ApiError> {
        request.validate()?;
        let session: AuthSession = self
            .client
            .post_anonymous("/auth/register", request)
            .await?;
        self.store_session(&session)?;
        tracing::info!(user_id = %session.user.id, "Account registered");
        Ok(session)
    }

    /// A session the server issued but we could not save is still a failed
    /// login, so the error goes to the notifier like any other.
    fn store_session(&self, session: &AuthSession) -> Result<(), ApiError> {
        self.client
            .token_store()
            .set_tokens(&session.tokens)
            .map_err(|e| self.client.report(e))
    }

    // ─── Profile ─────────────────────────────────────────────────────────────

    pub async fn profile(&self) -> Result<User, ApiError> {
        self.client.get("/auth/profile").await
    }

    pub async fn update_profile(&self, request: &UpdateProfileRequest) -> Result<User, ApiError> {
        if request.is_empty() {
            return Err(ApiError::InvalidInput("Nothing to update".to_string()));
        }
        request.validate()?;
        self.client.put("/auth/profile", request).await
    }

    pub async fn change_password(&self, request: &ChangePasswordRequest) -> Result<(), ApiError> {
        request.validate()?;
        self.client
            .put::<IgnoredAny, _>("/auth/change-password", request)
            .await?;
        Ok(())
    }

    // ─── Logout ──────────────────────────────────────────────────────────────

    /// End the session. The server call is best-effort and silent (no
    /// refresh, no notifications); local tokens are always cleared, even when
    /// the stored ones cannot be read.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let store = self.client.token_store();

        let tokens = store
            .access_token()
            .and_then(|access| Ok((access, store.refresh_token()?)));
        match tokens {
            Ok((Some(_), refresh_token)) => {
                let body = serde_json::json!({ "refreshToken": refresh_token });
                if let Err(e) = self.client.post_quiet("/auth/logout", &body).await {
                    tracing::warn!(error = %e, "Server-side logout failed, clearing local session");
                }
            }
            Ok((None, _)) => {}
            Err(e) => {
                tracing::warn!(error = %e, "Stored tokens unreadable, skipping server-side logout");
            }
        }

        store.clear().map_err(|e| self.client.report(e))?;
        tracing::info!("Logged out");
        Ok(())
    }
}
