//! Testimonial model.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Testimonial shown on the home page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    pub id: String,
    pub name: String,
    /// Role of the person (e.g. "Principal")
    #[serde(default)]
    pub designation: Option<String>,
    #[serde(default)]
    pub school: Option<String>,
    pub content: String,
    /// 1 to 5 stars
    #[serde(default)]
    pub rating: u8,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: String,
}

fn default_true() -> bool {
    true
}

/// Create/update payload for a testimonial.
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TestimonialInput {
    #[validate(length(min = 1, max = 100, message = "is required"))]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
    #[validate(length(min = 1, max = 2000, message = "is required"))]
    pub content: String,
    #[validate(range(min = 1, max = 5, message = "must be between 1 and 5"))]
    pub rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(url(message = "must be a URL"))]
    pub image: Option<String>,
    pub is_active: bool,
}
