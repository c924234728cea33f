//! FAQ model.

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Faq {
    pub id: String,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub category: Option<String>,
    /// Display position, ascending
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FaqInput {
    #[validate(length(min = 1, max = 500, message = "is required"))]
    pub question: String,
    #[validate(length(min = 1, message = "is required"))]
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub order: i32,
    pub is_active: bool,
}
