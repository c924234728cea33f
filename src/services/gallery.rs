// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Gallery images and generic file uploads.

use crate::client::{ApiClient, Upload, UploadFile};
use crate::error::ApiError;
use crate::models::{GalleryFilter, GalleryImage, UploadedFile};
use serde::de::IgnoredAny;
use urlencoding::encode;

/// Maximum number of files accepted by one multi-file upload.
pub const MAX_FILES_PER_UPLOAD: usize = 10;

#[derive(Clone)]
pub struct GalleryService {
    client: ApiClient,
}

impl GalleryService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, filter: &GalleryFilter) -> Result<Vec<GalleryImage>, ApiError> {
        self.client.get_with_query("/gallery", filter).await
    }

    /// Upload images into the gallery, optionally under a folder.
    pub async fn upload_images(
        &self,
        files: Vec<UploadFile>,
        folder: Option<String>,
    ) -> Result<Vec<GalleryImage>, ApiError> {
        check_batch(&files)?;
        if let Some(file) = files.iter().find(|f| !f.content_type.starts_with("image/")) {
            return Err(ApiError::InvalidInput(format!(
                "{} is not an image",
                file.file_name
            )));
        }

        let count = files.len();
        let images: Vec<GalleryImage> = self
            .client
            .upload("/gallery/upload", Upload::new("images", files).folder(folder))
            .await?;
        tracing::info!(count, stored = images.len(), "Gallery images uploaded");
        Ok(images)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .delete::<IgnoredAny>(&format!("/gallery/{}", encode(id)))
            .await?;
        Ok(())
    }

    // ─── Generic uploads ─────────────────────────────────────────────────────

    /// Upload one file (e.g. a blog cover image) and get its public URL.
    pub async fn upload_file(
        &self,
        file: UploadFile,
        folder: Option<String>,
    ) -> Result<UploadedFile, ApiError> {
        self.client
            .upload("/upload/single", Upload::new("file", vec![file]).folder(folder))
            .await
    }

    pub async fn upload_files(
        &self,
        files: Vec<UploadFile>,
        folder: Option<String>,
    ) -> Result<Vec<UploadedFile>, ApiError> {
        check_batch(&files)?;
        self.client
            .upload("/upload/multiple", Upload::new("files", files).folder(folder))
            .await
    }
}

fn check_batch(files: &[UploadFile]) -> Result<(), ApiError> {
    if files.len() > MAX_FILES_PER_UPLOAD {
        return Err(ApiError::InvalidInput(format!(
            "At most {MAX_FILES_PER_UPLOAD} files per upload"
        )));
    }
    Ok(())
}
