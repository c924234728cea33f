//! Admin dashboard aggregates.

use super::BlogPost;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Counts shown on the admin dashboard stat cards.
///
/// Computed by the backend; every counter defaults to zero so a partial
/// response still renders.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DashboardStats {
    pub total_posts: u32,
    pub published_posts: u32,
    pub draft_posts: u32,
    pub total_testimonials: u32,
    pub total_faqs: u32,
    pub total_gallery_images: u32,
    pub total_contacts: u32,
    pub total_users: u32,
    pub recent_posts: Vec<BlogPost>,
}
