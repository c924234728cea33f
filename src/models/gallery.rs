// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Gallery and upload models.

use serde::{Deserialize, Serialize};

/// Image stored in the lab gallery.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryImage {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    pub url: String,
    /// Destination folder the image was uploaded to
    #[serde(default)]
    pub folder: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub created_at: String,
}

/// Result of a generic file upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub url: String,
    #[serde(default)]
    pub filename: Option<String>,
    /// Size in bytes
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub mimetype: Option<String>,
}

/// Query filter for the gallery list.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GalleryFilter {
    pub folder: Option<String>,
    pub category: Option<String>,
}
