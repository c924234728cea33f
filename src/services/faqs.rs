//! FAQ management.

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::models::{Faq, FaqInput};
use serde::de::IgnoredAny;
use urlencoding::encode;
use validator::Validate;

#[derive(Clone)]
pub struct FaqService {
    client: ApiClient,
}

impl FaqService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// List FAQs in display order, optionally for a single category.
    pub async fn list(&self, category: Option<&str>) -> Result<Vec<Faq>, ApiError> {
        let mut faqs: Vec<Faq> = self
            .client
            .get_with_query("/faqs", &serde_json::json!({ "category": category }))
            .await?;
        // Stable, so equal positions keep server order
        faqs.sort_by_key(|faq| faq.order);
        Ok(faqs)
    }

    pub async fn create(&self, input: &FaqInput) -> Result<Faq, ApiError> {
        input.validate()?;
        self.client.post("/faqs", input).await
    }

    pub async fn update(&self, id: &str, input: &FaqInput) -> Result<Faq, ApiError> {
        input.validate()?;
        self.client
            .put(&format!("/faqs/{}", encode(id)), input)
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .delete::<IgnoredAny>(&format!("/faqs/{}", encode(id)))
            .await?;
        Ok(())
    }
}
