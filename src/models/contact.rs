//! Contact form submission.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Enquiry sent from the contact and lab landing pages.
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    #[validate(length(min = 1, max = 100, message = "is required"))]
    pub name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 7, max = 20, message = "must be a valid phone number"))]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[validate(length(min = 1, max = 5000, message = "is required"))]
    pub message: String,
}

/// Acknowledgement returned after a submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactReceipt {
    pub id: Option<String>,
    pub created_at: Option<String>,
}
