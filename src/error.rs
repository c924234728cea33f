// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client error types and their user-facing categories.

use std::collections::BTreeMap;

/// Broad class of a failure, used to pick the notification shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Auth,
    Validation,
    Network,
    Timeout,
    Generic,
}

/// Error type returned by every API call.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Session expired, please log in again")]
    SessionExpired,

    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        fields: BTreeMap<String, Vec<String>>,
    },

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Request timed out")]
    Timeout,

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Token storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    pub const NETWORK_MESSAGE: &'static str = "Network error. Please check your connection.";
    pub const TIMEOUT_MESSAGE: &'static str = "Request timed out. Please try again.";
    pub const GENERIC_MESSAGE: &'static str = "Something went wrong";

    /// Classify a transport error that produced no usable response.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err)
        }
    }

    /// Category used for notifications.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ApiError::Unauthorized(_) | ApiError::SessionExpired => ErrorCategory::Auth,
            ApiError::Validation { .. } | ApiError::InvalidInput(_) => ErrorCategory::Validation,
            ApiError::Network(_) => ErrorCategory::Network,
            ApiError::Timeout => ErrorCategory::Timeout,
            ApiError::Api { .. }
            | ApiError::Decode(_)
            | ApiError::Storage(_)
            | ApiError::Config(_) => ErrorCategory::Generic,
        }
    }

    /// Text shown to the user for this error.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => Self::NETWORK_MESSAGE.to_string(),
            ApiError::Timeout => Self::TIMEOUT_MESSAGE.to_string(),
            ApiError::Validation { message, .. } => message.clone(),
            ApiError::Api { message, .. } if !message.is_empty() => message.clone(),
            ApiError::InvalidInput(msg) | ApiError::Storage(msg) => msg.clone(),
            ApiError::Unauthorized(msg) if !msg.is_empty() => msg.clone(),
            ApiError::Unauthorized(_) => "Authentication required".to_string(),
            ApiError::SessionExpired => "Session expired. Please log in again.".to_string(),
            _ => Self::GENERIC_MESSAGE.to_string(),
        }
    }

    /// HTTP status carried by the error, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized(_) => Some(401),
            ApiError::Validation { .. } => Some(422),
            ApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let detail = errs
                    .iter()
                    .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .unwrap_or_else(|| "is invalid".to_string());
                if field == "__all__" {
                    detail
                } else {
                    format!("{field} {detail}")
                }
            })
            .collect();
        fields.sort();
        ApiError::InvalidInput(fields.join(", "))
    }
}

/// Result type alias for client calls
pub type Result<T> = std::result::Result<T, ApiError>;
