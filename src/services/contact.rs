//! Contact form submission.

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::models::{ContactReceipt, ContactRequest};
use validator::Validate;

#[derive(Clone)]
pub struct ContactService {
    client: ApiClient,
}

impl ContactService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Validate and submit an enquiry. The server may answer without a body.
    pub async fn submit(&self, request: &ContactRequest) -> Result<ContactReceipt, ApiError> {
        request.validate()?;
        let receipt: Option<ContactReceipt> = self.client.post("/contact", request).await?;
        Ok(receipt.unwrap_or_default())
    }
}
