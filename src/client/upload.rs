// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Multipart upload bodies.
//!
//! File contents are held in memory so the body can be rebuilt when a request
//! is re-issued after a token refresh.

use crate::error::ApiError;
use reqwest::multipart::{Form, Part};
use std::path::Path;

/// A single file to upload.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    /// Build from in-memory bytes, guessing the content type from the name.
    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = mime_guess::from_path(&file_name)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    /// Read a file from disk.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, ApiError> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ApiError::InvalidInput(format!("Not a file: {}", path.display())))?
            .to_string();
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            ApiError::InvalidInput(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Ok(Self::from_bytes(file_name, bytes))
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }
}

/// Files plus the form field they go under and an optional destination folder.
#[derive(Debug, Clone)]
pub struct Upload {
    pub field: String,
    pub files: Vec<UploadFile>,
    pub folder: Option<String>,
}

impl Upload {
    pub fn new(field: impl Into<String>, files: Vec<UploadFile>) -> Self {
        Self {
            field: field.into(),
            files,
            folder: None,
        }
    }

    pub fn folder(mut self, folder: Option<String>) -> Self {
        self.folder = folder.filter(|f| !f.trim().is_empty());
        self
    }

    pub(crate) fn validate(&self) -> Result<(), ApiError> {
        if self.files.is_empty() {
            return Err(ApiError::InvalidInput(
                "At least one file is required".to_string(),
            ));
        }
        Ok(())
    }

    /// Build a fresh multipart form.
    pub(crate) fn to_form(&self) -> Result<Form, ApiError> {
        let mut form = Form::new();
        for file in &self.files {
            let part = Part::bytes(file.bytes.clone())
                .file_name(file.file_name.clone())
                .mime_str(&file.content_type)
                .map_err(|e| {
                    ApiError::InvalidInput(format!(
                        "Invalid content type {}: {}",
                        file.content_type, e
                    ))
                })?;
            form = form.part(self.field.clone(), part);
        }
        if let Some(folder) = &self.folder {
            form = form.text("folder", folder.clone());
        }
        Ok(form)
    }
}
