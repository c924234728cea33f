//! Testimonial management.

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::models::{Testimonial, TestimonialInput};
use serde::de::IgnoredAny;
use urlencoding::encode;
use validator::Validate;

#[derive(Clone)]
pub struct TestimonialService {
    client: ApiClient,
}

impl TestimonialService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// List testimonials. `active_only` mirrors what the public home page shows.
    pub async fn list(&self, active_only: bool) -> Result<Vec<Testimonial>, ApiError> {
        if active_only {
            self.client
                .get_with_query("/testimonials", &serde_json::json!({ "active": true }))
                .await
        } else {
            self.client.get("/testimonials").await
        }
    }

    pub async fn create(&self, input: &TestimonialInput) -> Result<Testimonial, ApiError> {
        input.validate()?;
        self.client.post("/testimonials", input).await
    }

    pub async fn update(&self, id: &str, input: &TestimonialInput) -> Result<Testimonial, ApiError> {
        input.validate()?;
        self.client
            .put(&format!("/testimonials/{}", encode(id)), input)
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .delete::<IgnoredAny>(&format!("/testimonials/{}", encode(id)))
            .await?;
        Ok(())
    }
}
