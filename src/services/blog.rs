// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Blog posts and categories.

use crate::client::envelope::Page;
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::models::{BlogCategory, BlogPost, CategoryInput, PostFilter, PostInput};
use serde::de::IgnoredAny;
use urlencoding::encode;
use validator::Validate;

/// Largest page size the list endpoint accepts.
const MAX_PAGE_SIZE: u32 = 100;

#[derive(Clone)]
pub struct BlogService {
    client: ApiClient,
}

impl BlogService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// List posts with pagination metadata.
    pub async fn list_posts(&self, filter: &PostFilter) -> Result<Page<BlogPost>, ApiError> {
        if filter.page == Some(0) {
            return Err(ApiError::InvalidInput("page starts at 1".to_string()));
        }
        if filter.limit.is_some_and(|l| l == 0 || l > MAX_PAGE_SIZE) {
            return Err(ApiError::InvalidInput(format!(
                "limit must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        self.client.get_page("/blog/posts", filter).await
    }

    pub async fn get_post_by_slug(&self, slug: &str) -> Result<BlogPost, ApiError> {
        self.client
            .get(&format!("/blog/posts/slug/{}", encode(slug)))
            .await
    }

    pub async fn get_post(&self, id: &str) -> Result<BlogPost, ApiError> {
        self.client.get(&format!("/blog/posts/{}", encode(id))).await
    }

    pub async fn create_post(&self, input: &PostInput) -> Result<BlogPost, ApiError> {
        input.validate()?;
        self.client.post("/blog/posts", input).await
    }

    pub async fn update_post(&self, id: &str, input: &PostInput) -> Result<BlogPost, ApiError> {
        input.validate()?;
        self.client
            .put(&format!("/blog/posts/{}", encode(id)), input)
            .await
    }

    pub async fn delete_post(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .delete::<IgnoredAny>(&format!("/blog/posts/{}", encode(id)))
            .await?;
        tracing::info!(post_id = id, "Blog post deleted");
        Ok(())
    }

    // ─── Categories ──────────────────────────────────────────────────────────

    pub async fn list_categories(&self) -> Result<Vec<BlogCategory>, ApiError> {
        self.client.get("/blog/categories").await
    }

    pub async fn create_category(&self, input: &CategoryInput) -> Result<BlogCategory, ApiError> {
        input.validate()?;
        self.client.post("/blog/categories", input).await
    }

    pub async fn delete_category(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .delete::<IgnoredAny>(&format!("/blog/categories/{}", encode(id)))
            .await?;
        Ok(())
    }
}
