// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! One-time passcode login steps.
//!
//! `EnterIdentifier` -> `CodeSent` -> `Verified`. Every transition takes
//! `&mut self`, so a flow cannot have two submissions in flight.

use crate::error::ApiError;
use crate::models::auth::validate_otp_code;
use crate::models::AuthSession;
use crate::services::AuthService;
use chrono::{DateTime, Duration, Utc};

/// Wait before another code may be requested.
pub const RESEND_COOLDOWN_SECS: i64 = 60;

/// Where the flow currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OtpStep {
    EnterIdentifier,
    CodeSent {
        identifier: String,
        sent_at: DateTime<Utc>,
    },
    Verified,
}

/// OTP login flow bound to an auth service.
pub struct OtpLogin {
    auth: AuthService,
    step: OtpStep,
}

impl OtpLogin {
    pub fn new(auth: AuthService) -> Self {
        Self {
            auth,
            step: OtpStep::EnterIdentifier,
        }
    }

    pub fn step(&self) -> &OtpStep {
        &self.step
    }

    /// Request a code for `identifier`. Allowed from `EnterIdentifier`, or from
    /// `CodeSent` once the resend cooldown has passed, whichever identifier
    /// is used.
    pub async fn send_code(&mut self, identifier: &str) -> Result<(), ApiError> {
        self.send_code_at(identifier, Utc::now()).await
    }

    async fn send_code_at(&mut self, identifier: &str, now: DateTime<Utc>) -> Result<(), ApiError> {
        let identifier = identifier.trim();
        if self.step == OtpStep::Verified {
            return Err(ApiError::InvalidInput("Already logged in".to_string()));
        }
        // The cooldown belongs to the flow, not the identifier
        self.check_cooldown(now)?;

        self.auth.send_otp(identifier).await?;
        self.step = OtpStep::CodeSent {
            identifier: identifier.to_string(),
            sent_at: now,
        };
        Ok(())
    }

    /// Seconds until another code may be requested; zero when allowed or not
    /// applicable.
    pub fn resend_remaining(&self, now: DateTime<Utc>) -> i64 {
        match &self.step {
            OtpStep::CodeSent { sent_at, .. } => {
                let ready_at = *sent_at + Duration::seconds(RESEND_COOLDOWN_SECS);
                (ready_at - now).num_seconds().max(0)
            }
            _ => 0,
        }
    }

    /// Request a fresh code for the current identifier once the cooldown ends.
    pub async fn resend_code(&mut self) -> Result<(), ApiError> {
        self.resend_code_at(Utc::now()).await
    }

    async fn resend_code_at(&mut self, now: DateTime<Utc>) -> Result<(), ApiError> {
        let OtpStep::CodeSent { identifier, .. } = &self.step else {
            return Err(ApiError::InvalidInput("No code has been sent yet".to_string()));
        };

        let identifier = identifier.clone();
        self.check_cooldown(now)?;

        self.auth.send_otp(&identifier).await?;
        self.step = OtpStep::CodeSent {
            identifier,
            sent_at: now,
        };
        Ok(())
    }

    fn check_cooldown(&self, now: DateTime<Utc>) -> Result<(), ApiError> {
        let remaining = self.resend_remaining(now);
        if remaining > 0 {
            return Err(ApiError::InvalidInput(format!(
                "Please wait {remaining}s before requesting a new code"
            )));
        }
        Ok(())
    }

    /// Submit the code. On success the session is stored and the flow ends.
    /// A rejected code leaves the flow in `CodeSent` for another attempt.
    pub async fn verify(&mut self, code: &str) -> Result<AuthSession, ApiError> {
        let OtpStep::CodeSent { identifier, .. } = &self.step else {
            return Err(ApiError::InvalidInput(
                "Request a code before verifying".to_string(),
            ));
        };

        let code = code.trim();
        validate_otp_code(code)
            .map_err(|_| ApiError::InvalidInput("Enter the 6-digit code".to_string()))?;

        let session = self.auth.verify_otp(identifier, code).await?;
        self.step = OtpStep::Verified;
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ApiClient;

    fn flow() -> OtpLogin {
        // Never contacted by these tests
        let client = ApiClient::builder()
            .base_url("http://127.0.0.1:9")
            .build()
            .unwrap();
        OtpLogin::new(AuthService::new(client))
    }

    #[test]
    fn test_resend_countdown() {
        let mut flow = flow();
        let sent_at = Utc::now();
        flow.step = OtpStep::CodeSent {
            identifier: "coordinator@school.edu".to_string(),
            sent_at,
        };

        assert_eq!(flow.resend_remaining(sent_at), RESEND_COOLDOWN_SECS);
        assert_eq!(flow.resend_remaining(sent_at + Duration::seconds(45)), 15);
        assert_eq!(flow.resend_remaining(sent_at + Duration::seconds(90)), 0);
    }

    #[tokio::test]
    async fn test_resend_blocked_during_cooldown() {
        let mut flow = flow();
        let sent_at = Utc::now();
        flow.step = OtpStep::CodeSent {
            identifier: "coordinator@school.edu".to_string(),
            sent_at,
        };

        let err = flow
            .resend_code_at(sent_at + Duration::seconds(10))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(msg) if msg.contains("50s")));
    }

    #[tokio::test]
    async fn test_switching_identifier_keeps_cooldown() {
        let mut flow = flow();
        let sent_at = Utc::now();
        flow.step = OtpStep::CodeSent {
            identifier: "coordinator@school.edu".to_string(),
            sent_at,
        };

        let err = flow
            .send_code_at("9876543210", sent_at + Duration::seconds(20))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(msg) if msg.contains("40s")));
        assert!(matches!(
            flow.step(),
            OtpStep::CodeSent { identifier, .. } if identifier == "coordinator@school.edu"
        ));
    }

    #[tokio::test]
    async fn test_verify_requires_sent_code() {
        let mut flow = flow();
        assert!(matches!(
            flow.verify("123456").await,
            Err(ApiError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_malformed_code_rejected_locally() {
        let mut flow = flow();
        flow.step = OtpStep::CodeSent {
            identifier: "9876543210".to_string(),
            sent_at: Utc::now(),
        };
        assert!(matches!(
            flow.verify("12ab56").await,
            Err(ApiError::InvalidInput(_))
        ));
        assert!(matches!(flow.step(), OtpStep::CodeSent { .. }));
    }
}
